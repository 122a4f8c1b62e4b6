//! Template and mapping assets.
//!
//! Each form has a fillable PDF under `templates/` and a mapping document under
//! `mappings/`, both named after the form's slug. Loaded bytes are cached in moka with a
//! time-to-live; mappings are cached already parsed.

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use thiserror::Error;

use super::mapping::MappingNode;
use super::{FormId, GeneratorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Template,
    Mapping,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template => f.write_str("template"),
            Self::Mapping => f.write_str("mapping"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{kind} not found at {location}")]
    NotFound { kind: AssetKind, location: String },
    #[error("failed to read {kind} at {location}: {source}")]
    Io {
        kind: AssetKind,
        location: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source of template PDFs and mapping documents.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn load(&self, form: FormId, kind: AssetKind) -> Result<Vec<u8>, AssetError>;
}

/// Reads assets from `<root>/templates/<slug>.pdf` and `<root>/mappings/<slug>.json`.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, form: FormId, kind: AssetKind) -> PathBuf {
        match kind {
            AssetKind::Template => self.root.join("templates").join(form.template_file()),
            AssetKind::Mapping => self.root.join("mappings").join(form.mapping_file()),
        }
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn load(&self, form: FormId, kind: AssetKind) -> Result<Vec<u8>, AssetError> {
        let path = self.path_for(form, kind);
        let location = path.display().to_string();
        tokio::fs::read(&path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                AssetError::NotFound { kind, location }
            } else {
                AssetError::Io {
                    kind,
                    location,
                    source,
                }
            }
        })
    }
}

/// Caching front for an [`AssetStore`]. A zero time-to-live disables caching.
pub struct AssetCache {
    store: Arc<dyn AssetStore>,
    templates: Option<Cache<FormId, Arc<Vec<u8>>>>,
    mappings: Option<Cache<FormId, Arc<MappingNode>>>,
}

impl AssetCache {
    pub fn new(store: Arc<dyn AssetStore>, ttl: Duration) -> Self {
        let enabled = !ttl.is_zero();
        let capacity = FormId::ALL.len() as u64;

        Self {
            store,
            templates: enabled.then(|| {
                Cache::builder()
                    .time_to_live(ttl)
                    .max_capacity(capacity)
                    .build()
            }),
            mappings: enabled.then(|| {
                Cache::builder()
                    .time_to_live(ttl)
                    .max_capacity(capacity)
                    .build()
            }),
        }
    }

    pub async fn template(&self, form: FormId) -> Result<Arc<Vec<u8>>, GeneratorError> {
        if let Some(cached) = self.cached(&self.templates, form).await {
            return Ok(cached);
        }

        let bytes = Arc::new(self.fetch(form, AssetKind::Template).await?);
        if let Some(cache) = &self.templates {
            cache.insert(form, bytes.clone()).await;
            log::debug!("Cached template for {} ({} bytes)", form, bytes.len());
        }
        Ok(bytes)
    }

    pub async fn mapping(&self, form: FormId) -> Result<Arc<MappingNode>, GeneratorError> {
        if let Some(cached) = self.cached(&self.mappings, form).await {
            return Ok(cached);
        }

        let bytes = self.fetch(form, AssetKind::Mapping).await?;
        let node = MappingNode::from_slice(&bytes)
            .map_err(|source| GeneratorError::Mapping { form, source })?;
        let node = Arc::new(node);
        if let Some(cache) = &self.mappings {
            cache.insert(form, node.clone()).await;
            log::debug!(
                "Cached mapping for {} ({} fields)",
                form,
                node.field_count()
            );
        }
        Ok(node)
    }

    async fn cached<V>(&self, cache: &Option<Cache<FormId, V>>, form: FormId) -> Option<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        cache.as_ref()?.get(&form).await
    }

    async fn fetch(&self, form: FormId, kind: AssetKind) -> Result<Vec<u8>, GeneratorError> {
        self.store.load(form, kind).await.map_err(|source| {
            log::error!("Failed to load {} for {}: {}", kind, form, source);
            GeneratorError::Asset { form, source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl AssetStore for CountingStore {
        async fn load(&self, _form: FormId, kind: AssetKind) -> Result<Vec<u8>, AssetError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(match kind {
                AssetKind::Template => b"%PDF-1.7".to_vec(),
                AssetKind::Mapping => br#"{ "name": "Name" }"#.to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn test_fs_store_reads_by_slug() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("mappings")).unwrap();
        std::fs::write(
            dir.path().join("mappings").join("questionnaire.json"),
            b"{}",
        )
        .unwrap();

        let store = FsAssetStore::new(dir.path());
        let bytes = store
            .load(FormId::Questionnaire, AssetKind::Mapping)
            .await
            .unwrap();
        assert_eq!(bytes, b"{}");

        let missing = store
            .load(FormId::Questionnaire, AssetKind::Template)
            .await
            .unwrap_err();
        assert!(matches!(
            missing,
            AssetError::NotFound {
                kind: AssetKind::Template,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_cache_loads_once_within_ttl() {
        let store = Arc::new(CountingStore {
            loads: AtomicUsize::new(0),
        });
        let cache = AssetCache::new(store.clone(), Duration::from_secs(60));

        cache.mapping(FormId::ProBonoAffidavit).await.unwrap();
        cache.mapping(FormId::ProBonoAffidavit).await.unwrap();
        cache.template(FormId::ProBonoAffidavit).await.unwrap();
        cache.template(FormId::ProBonoAffidavit).await.unwrap();

        assert_eq!(store.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let store = Arc::new(CountingStore {
            loads: AtomicUsize::new(0),
        });
        let cache = AssetCache::new(store.clone(), Duration::ZERO);

        cache.template(FormId::Questionnaire).await.unwrap();
        cache.template(FormId::Questionnaire).await.unwrap();

        assert_eq!(store.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_mapping_is_a_structural_error() {
        struct BrokenStore;

        #[async_trait]
        impl AssetStore for BrokenStore {
            async fn load(&self, _: FormId, _: AssetKind) -> Result<Vec<u8>, AssetError> {
                Ok(br#"{ "flag": true }"#.to_vec())
            }
        }

        let cache = AssetCache::new(Arc::new(BrokenStore), Duration::from_secs(60));
        let err = cache.mapping(FormId::Questionnaire).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Mapping { .. }));
        assert!(!err.is_client_error());
    }
}
