//! Graph document loader.

use std::path::Path;

use dpr_core::{CatalogOracle, EngineSettings, Graph};

use crate::formats::{DocumentParts, GraphDocument};
use crate::loaders::{LoadResult, read_file, write_file};
use crate::seed::seed_graph;

/// Loader for graph documents (JSON).
pub struct GraphLoader;

impl GraphLoader {
    /// Load and decode a graph document.
    ///
    /// Fails when the file cannot be read or when `nodes`/`edges` are not
    /// arrays. Everything inside the arrays decodes leniently.
    pub fn load<C: CatalogOracle + ?Sized>(path: &Path, catalog: &C) -> LoadResult<DocumentParts> {
        let content = read_file(path)?;
        let document = GraphDocument::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse graph document {}: {}", path.display(), e))?;
        let parts = document.into_parts(catalog);
        tracing::info!(
            path = %path.display(),
            nodes = parts.graph.nodes.len(),
            edges = parts.graph.edges.len(),
            "loaded graph document"
        );
        Ok(parts)
    }

    /// Like [`GraphLoader::load`], but an unreadable or malformed document
    /// yields the seeded starter graph with default settings.
    pub fn load_or_seed<C: CatalogOracle + ?Sized>(path: &Path, catalog: &C) -> DocumentParts {
        Self::load(path, catalog).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "graph document unusable; starting from seed");
            DocumentParts {
                graph: seed_graph(),
                settings: EngineSettings::default(),
                migrated: 0,
                skipped: 0,
            }
        })
    }

    /// Write a graph and its settings as a pretty-printed document.
    pub fn save(path: &Path, graph: &Graph, settings: &EngineSettings) -> LoadResult<()> {
        let json = GraphDocument::from_graph(graph, settings)
            .and_then(|document| document.to_json_pretty())
            .map_err(|e| anyhow::anyhow!("Failed to encode graph document: {}", e))?;
        write_file(path, &json)?;
        tracing::info!(path = %path.display(), nodes = graph.nodes.len(), "saved graph document");
        Ok(())
    }
}
