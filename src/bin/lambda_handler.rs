//! AWS Lambda handler for break-even simulations
//!
//! Accepts a JSON `SimulationInput` through API Gateway and returns the simulation result.
//! Set REFERENCE_DIR to load reference tables from CSV instead of the built-in ones.
//!
//! Request bodies must be plain JSON text. Base64-encoded bodies (binary media types)
//! are not decoded and are rejected with 400.

use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use chrono::{DateTime, Utc};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Serialize;

use solar_gpu_breakeven::{
    Error as SimulationError, FinancialModel, ModelConfig, ReferenceData, SimulationInput,
    SimulationResult,
};

/// Output for a successful simulation
#[derive(Debug, Serialize)]
struct SimulationResponse {
    generated_at: DateTime<Utc>,
    result: SimulationResult,
    execution_time_ms: u64,
}

fn error_response(status: i64, message: &str) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: status,
        body: Some(Body::Text(serde_json::json!({ "error": message }).to_string())),
        ..Default::default()
    }
}

fn status_for(error: &SimulationError) -> i64 {
    match error {
        SimulationError::UnknownModel { .. }
        | SimulationError::UnknownCompetitor { .. }
        | SimulationError::InvalidInput { .. }
        | SimulationError::Json(_) => 400,
        _ => 500,
    }
}

/// Lambda handler function
async fn handler(
    model: &FinancialModel,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let start = Instant::now();
    if event.payload.is_base64_encoded {
        return Ok(error_response(400, "Base64-encoded request bodies are not supported"));
    }
    let body = event.payload.body.unwrap_or_default();

    let input = match SimulationInput::from_json_str(&body) {
        Ok(input) => input,
        Err(e) => return Ok(error_response(400, &format!("Invalid JSON: {}", e))),
    };

    let result = match model.simulate(&input) {
        Ok(result) => result,
        Err(e) => {
            log::warn!("Simulation rejected: {}", e);
            return Ok(error_response(status_for(&e), &e.to_string()));
        }
    };

    let response = SimulationResponse {
        generated_at: Utc::now(),
        result,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    Ok(ApiGatewayProxyResponse {
        status_code: 200,
        body: Some(Body::Text(serde_json::to_string(&response)?)),
        ..Default::default()
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let reference = match env::var("REFERENCE_DIR") {
        Ok(dir) => ReferenceData::from_csv_path(Path::new(&dir))?,
        Err(_) => ReferenceData::default_reference(),
    };
    let model = Arc::new(FinancialModel::new(reference, ModelConfig::default())?);

    run(service_fn(move |event| {
        let model = Arc::clone(&model);
        async move { handler(&model, event).await }
    }))
    .await
}
