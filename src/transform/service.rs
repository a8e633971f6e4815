use std::time::Instant;

use serde_json::Value;

use super::model::prune_nulls;
use super::{CustomerInput, ToDataModel, TransformError, TransformResult};
use crate::metrics::TransformMetrics;
use crate::template::{DataModel, TemplateEngine, TeraEngine};

/// Renders input payloads through named templates.
///
/// Holds no mutable state; one instance is shared by every request.
pub struct TransformService<E: TemplateEngine = TeraEngine> {
    engine: E,
}

impl<E: TemplateEngine> TransformService<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Render a typed customer record
    #[tracing::instrument(name = "transform.customer", skip_all, fields(template = %template_name))]
    pub fn transform(&self, input: &CustomerInput, template_name: &str) -> TransformResult<String> {
        tracing::info!(
            customer_id = ?input.customer_id,
            "Starting JSON transformation"
        );

        self.render_model(input.to_data_model(), template_name, "customer")
    }

    /// Parse raw JSON text and render it
    #[tracing::instrument(name = "transform.raw", skip_all, fields(template = %template_name))]
    pub fn transform_raw(&self, input_json: &str, template_name: &str) -> TransformResult<String> {
        let value: Value = serde_json::from_str(input_json).map_err(|e| {
            TransformMetrics::record_failed("raw", "malformed_input");
            TransformError::MalformedInput(e)
        })?;

        self.transform_value(value, template_name, "raw")
    }

    /// Render an already-parsed JSON value; only objects are accepted
    fn transform_value(
        &self,
        input: Value,
        template_name: &str,
        source: &'static str,
    ) -> TransformResult<String> {
        let model = into_data_model(input).inspect_err(|_| {
            TransformMetrics::record_failed(source, "conversion");
        })?;

        self.render_model(model, template_name, source)
    }

    fn render_model(
        &self,
        model: DataModel,
        template_name: &str,
        source: &'static str,
    ) -> TransformResult<String> {
        let started = Instant::now();

        let result = self
            .engine
            .resolve(template_name)
            .and_then(|template| self.engine.render(&template, &model));

        match result {
            Ok(output) => {
                TransformMetrics::record_rendered(source, started.elapsed());
                tracing::debug!(output = %output, "Transformation completed");
                Ok(output)
            }
            Err(e) => {
                TransformMetrics::record_failed(source, TransformMetrics::template_reason(&e));
                Err(e.into())
            }
        }
    }
}

fn into_data_model(value: Value) -> TransformResult<DataModel> {
    match value {
        Value::Object(map) => Ok(prune_nulls(map)),
        Value::Null => Err(TransformError::Conversion("null")),
        Value::Bool(_) => Err(TransformError::Conversion("a boolean")),
        Value::Number(_) => Err(TransformError::Conversion("a number")),
        Value::String(_) => Err(TransformError::Conversion("a string")),
        Value::Array(_) => Err(TransformError::Conversion("an array")),
    }
}
