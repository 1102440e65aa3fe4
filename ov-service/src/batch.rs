//! Batch inspection on a blocking worker pool
//!
//! Every worker opens its session against the same `Inspector`, so the
//! cache and viewer registry are shared across threads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ov_inspector::{DisplayModel, Inspector};
use ov_introspection::DescribedObject;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<DisplayModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn inspect_one(inspector: &Inspector, path: &Path) -> ov_core::Result<DisplayModel> {
    let object = DescribedObject::load(path)?;
    let mut session = inspector.open_described(object);
    let model = session.display_model();
    session.close();
    Ok(model)
}

/// Inspect each file, at most `workers` at a time. Results keep input order.
pub async fn inspect_batch(inspector: Inspector, paths: Vec<PathBuf>, workers: usize) -> Vec<BatchResult> {
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let mut handles = Vec::with_capacity(paths.len());

    for path in paths {
        let inspector = inspector.clone();
        let permits = Arc::clone(&permits);
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await;
            let task_path = path.clone();
            let outcome = tokio::task::spawn_blocking(move || inspect_one(&inspector, &task_path)).await;

            match outcome {
                Ok(Ok(model)) => {
                    debug!("Inspected {}", path.display());
                    BatchResult {
                        path,
                        model: Some(model),
                        error: None,
                    }
                }
                Ok(Err(e)) => {
                    warn!("Failed to inspect {}: {}", path.display(), e);
                    BatchResult {
                        path,
                        model: None,
                        error: Some(e.to_string()),
                    }
                }
                Err(e) => BatchResult {
                    path,
                    model: None,
                    error: Some(format!("worker failed: {}", e)),
                },
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(result) => results.push(result),
            Err(e) => warn!("Batch task failed: {}", e),
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_object(dir: &tempfile::TempDir, file: &str, body: &str) -> PathBuf {
        let path = dir.path().join(file);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..5 {
            paths.push(write_object(
                &dir,
                &format!("obj{}.json", i),
                &format!(
                    r#"{{ "name": "Object{}", "interfaces": [ {{ "iid": "{{00000000-0000-0000-c000-000000000046}}", "name": "IUnknown" }} ] }}"#,
                    i
                ),
            ));
        }
        paths.push(write_object(&dir, "broken.json", "{ not json"));
        paths.push(dir.path().join("missing.json"));

        let inspector = Inspector::with_builtin_viewers();
        let results = inspect_batch(inspector.clone(), paths.clone(), 2).await;

        assert_eq!(results.len(), 7);
        for (i, result) in results.iter().take(5).enumerate() {
            assert_eq!(result.path, paths[i]);
            let model = result.model.as_ref().unwrap();
            assert_eq!(model.name, format!("Object{}", i));
            assert_eq!(model.interfaces.len(), 1);
        }
        assert!(results[5].error.is_some());
        assert!(results[6].error.is_some());

        // Every session was closed
        assert!(inspector.cache().is_empty());
    }
}
