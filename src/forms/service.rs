//! Entry points used by the HTTP layer: generate one document, generate every document
//! for a repeated form, count entries, list template fields.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::acroform::{FieldInfo, PdfForm};
use super::assets::{AssetCache, AssetStore};
use super::generators::common::require_object;
use super::generators::{generator_for, PdfFillEngine};
use super::{FormId, GeneratedDocument, GeneratorError};
use crate::metrics;

pub struct FormService {
    assets: AssetCache,
}

impl FormService {
    pub fn new(store: Arc<dyn AssetStore>, cache_ttl: Duration) -> Self {
        Self {
            assets: AssetCache::new(store, cache_ttl),
        }
    }

    /// How many documents "generate all" would produce.
    pub fn entry_count(&self, form: FormId, data: &Value) -> usize {
        generator_for(form).entry_count(data)
    }

    /// Fill `form` for entry `selection` of its repeated list (0 for single forms).
    pub async fn generate(
        &self,
        form: FormId,
        data: &Value,
        selection: usize,
    ) -> Result<GeneratedDocument, GeneratorError> {
        let result = self.generate_one(form, data, selection).await;
        track(form, &result);
        result
    }

    /// One document per entry, in list order. Assets are loaded once for the batch.
    pub async fn generate_all(
        &self,
        form: FormId,
        data: &Value,
    ) -> Result<Vec<GeneratedDocument>, GeneratorError> {
        require_object(data, form)?;
        let generator = generator_for(form);
        let count = generator.entry_count(data);
        if count == 0 {
            return Ok(Vec::new());
        }

        let template = self.assets.template(form).await;
        let mapping = self.assets.mapping(form).await;
        let (template, mapping) = match (template, mapping) {
            (Ok(template), Ok(mapping)) => (template, mapping),
            (Err(e), _) | (_, Err(e)) => {
                metrics::GENERATION_FAILURES
                    .with_label_values(&[form.slug()])
                    .inc();
                return Err(e);
            }
        };

        let mut documents = Vec::with_capacity(count);
        for index in 0..count {
            let result = generator
                .prepare(data, index)
                .and_then(|prepared| PdfFillEngine::render(form, &template, &mapping, prepared));
            track(form, &result);
            documents.push(result?);
        }

        log::info!("Generated {} {} documents", documents.len(), form);
        Ok(documents)
    }

    /// Terminal fields of the form's template.
    pub async fn template_fields(&self, form: FormId) -> Result<Vec<FieldInfo>, GeneratorError> {
        let template = self.assets.template(form).await?;
        let pdf =
            PdfForm::open(&template).map_err(|source| GeneratorError::Template { form, source })?;
        Ok(pdf.fields())
    }

    async fn generate_one(
        &self,
        form: FormId,
        data: &Value,
        selection: usize,
    ) -> Result<GeneratedDocument, GeneratorError> {
        let prepared = generator_for(form).prepare(data, selection)?;
        let template = self.assets.template(form).await?;
        let mapping = self.assets.mapping(form).await?;
        PdfFillEngine::render(form, &template, &mapping, prepared)
    }
}

fn track(form: FormId, result: &Result<GeneratedDocument, GeneratorError>) {
    match result {
        Ok(_) => metrics::FORMS_GENERATED.with_label_values(&[form.slug()]).inc(),
        Err(e) => {
            log::error!("Generation failed: {}", e);
            metrics::GENERATION_FAILURES
                .with_label_values(&[form.slug()])
                .inc();
        }
    }
}
