//! Semantic similarity and hybrid search test queries
//!
//! Each query embeds a fixed text with the configured provider and searches
//! one of the vector indexes, optionally filtering or traversing the graph
//! around the hits.

use super::{formatting, run_query, CatalogQuery, Column};
use crate::embeddings::EmbeddingProvider;
use crate::neo4j::{GraphStore, QueryParam};
use anyhow::Result;
use std::io::Write;
use std::time::Instant;
use tracing::warn;

pub struct SemanticQuery {
    pub query: CatalogQuery,
    /// Text embedded and passed as `$embedding`
    pub text: &'static str,
    /// Extra property filter parameter, e.g. `("req_type", "HW")`
    pub filter: Option<(&'static str, &'static str)>,
}

pub const TEST_QUERIES: &[SemanticQuery] = &[
    SemanticQuery {
        query: CatalogQuery {
            title: "1. Vector Similarity \u{2014} Requirements",
            description: "Requirements semantically similar to the query.",
            cypher: "\
CALL db.index.vector.queryNodes('requirementEmbeddings', $top_k, $embedding)
YIELD node AS req, score
RETURN req.requirement_id AS req_id,
       req.name AS name,
       req.description AS description,
       score
ORDER BY score DESC",
            columns: &[
                Column::score("Score", "score"),
                Column::text("Req ID", "req_id"),
                Column::truncated("Requirement", "name", 28),
                Column::truncated("Description", "description", 40),
            ],
            empty_message: "(no results \u{2014} run 'load' first)",
        },
        text: "thermal management and battery cooling",
        filter: None,
    },
    SemanticQuery {
        query: CatalogQuery {
            title: "2. Vector Similarity \u{2014} Defects",
            description: "Defects semantically similar to the query.",
            cypher: "\
CALL db.index.vector.queryNodes('defectEmbeddings', $top_k, $embedding)
YIELD node AS defect, score
RETURN defect.defect_id AS defect_id,
       defect.description AS description,
       defect.severity AS severity,
       defect.status AS status,
       score
ORDER BY score DESC",
            columns: &[
                Column::score("Score", "score"),
                Column::text("Defect", "defect_id"),
                Column::truncated("Severity", "severity", 10),
                Column::truncated("Description", "description", 40),
            ],
            empty_message: "(no results \u{2014} run 'load' first)",
        },
        text: "battery temperature exceeding limits",
        filter: None,
    },
    SemanticQuery {
        query: CatalogQuery {
            title: "3. Vector + Graph Context \u{2014} Requirements",
            description: "Semantic search with component and test set context.",
            cypher: "\
CALL db.index.vector.queryNodes('requirementEmbeddings', $top_k, $embedding)
YIELD node AS req, score
OPTIONAL MATCH (c:Component)-[:COMPONENT_HAS_REQ]->(req)
OPTIONAL MATCH (req)-[:TESTED_WITH]->(ts:TestSet)
WITH req, score, c, count(DISTINCT ts) AS test_sets
RETURN req.name AS name,
       c.name AS component,
       req.description AS description,
       test_sets,
       score
ORDER BY score DESC",
            columns: &[
                Column::score("Score", "score"),
                Column::truncated("Requirement", "name", 28),
                Column::text("Component", "component"),
                Column::truncated("Description", "description", 40),
                Column::text("Test sets", "test_sets"),
            ],
            empty_message: "(no results)",
        },
        text: "electrical safety and high voltage protection",
        filter: None,
    },
    SemanticQuery {
        query: CatalogQuery {
            title: "4. Vector + Graph Context \u{2014} Defect Traceability",
            description: "Semantic defect search with the full traceability chain.",
            cypher: "\
CALL db.index.vector.queryNodes('defectEmbeddings', $top_k, $embedding)
YIELD node AS defect, score
OPTIONAL MATCH (tc:TestCase)-[:DETECTED]->(defect)
OPTIONAL MATCH (ts:TestSet)-[:CONTAINS_TEST_CASE]->(tc)
OPTIONAL MATCH (req:Requirement)-[:TESTED_WITH]->(ts)
OPTIONAL MATCH (c:Component)-[:COMPONENT_HAS_REQ]->(req)
WITH defect, score,
     collect(DISTINCT c.name) AS components,
     collect(DISTINCT req.name)[..3] AS requirements,
     collect(DISTINCT tc.name)[..3] AS test_cases
RETURN defect.defect_id AS defect_id,
       defect.severity AS severity,
       defect.description AS description,
       components,
       requirements,
       test_cases,
       score
ORDER BY score DESC",
            columns: &[
                Column::score("Score", "score"),
                Column::text("Defect", "defect_id"),
                Column::text("Severity", "severity"),
                Column::truncated("Description", "description", 40),
                Column::truncated("Components", "components", 30),
                Column::truncated("Requirements", "requirements", 40),
                Column::truncated("Test cases", "test_cases", 40),
            ],
            empty_message: "(no results)",
        },
        text: "component not meeting design specifications",
        filter: None,
    },
    SemanticQuery {
        query: CatalogQuery {
            title: "5. Cross-Domain \u{2014} Requirements \u{2192} Defects",
            description: "Requirements matching the query, then the defects their tests detected.",
            cypher: "\
CALL db.index.vector.queryNodes('requirementEmbeddings', $top_k, $embedding)
YIELD node AS req, score
MATCH (req)<-[:COMPONENT_HAS_REQ]-(c:Component)
MATCH (req)-[:TESTED_WITH]->(ts:TestSet)-[:CONTAINS_TEST_CASE]->(tc:TestCase)
      -[:DETECTED]->(d:Defect)
WITH req, score, c,
     collect(DISTINCT d.defect_id + ' [' + coalesce(d.severity, '?') + ']') AS defects
RETURN req.name AS requirement,
       c.name AS component,
       defects,
       score
ORDER BY score DESC",
            columns: &[
                Column::score("Score", "score"),
                Column::truncated("Requirement", "requirement", 28),
                Column::text("Component", "component"),
                Column::text("Defects", "defects"),
            ],
            empty_message: "(no matching requirements with defects)",
        },
        text: "electromagnetic compatibility and interference",
        filter: None,
    },
    SemanticQuery {
        query: CatalogQuery {
            title: "6. Hybrid \u{2014} Vector + Property Filter",
            description: "Semantic requirement search filtered on requirement type.",
            cypher: "\
CALL db.index.vector.queryNodes('requirementEmbeddings', $top_k, $embedding)
YIELD node AS req, score
WHERE req.type = $req_type
OPTIONAL MATCH (c:Component)-[:COMPONENT_HAS_REQ]->(req)
RETURN req.requirement_id AS req_id,
       req.name AS name,
       req.type AS type,
       req.description AS description,
       c.name AS component,
       score
ORDER BY score DESC",
            columns: &[
                Column::score("Score", "score"),
                Column::text("Type", "type"),
                Column::truncated("Component", "component", 12),
                Column::truncated("Requirement", "name", 25),
                Column::truncated("Description", "description", 35),
            ],
            empty_message: "(no requirements of this type match)",
        },
        text: "safety monitoring systems",
        filter: Some(("req_type", "HW")),
    },
    SemanticQuery {
        query: CatalogQuery {
            title: "7. Hybrid \u{2014} Vector + Severity Filter",
            description: "Semantic defect search filtered on severity.",
            cypher: "\
CALL db.index.vector.queryNodes('defectEmbeddings', $top_k, $embedding)
YIELD node AS defect, score
WHERE defect.severity = $severity
OPTIONAL MATCH (tc:TestCase)-[:DETECTED]->(defect)
OPTIONAL MATCH (ts:TestSet)-[:CONTAINS_TEST_CASE]->(tc)
OPTIONAL MATCH (req:Requirement)-[:TESTED_WITH]->(ts)
RETURN defect.defect_id AS defect_id,
       defect.severity AS severity,
       defect.status AS status,
       defect.description AS description,
       collect(DISTINCT req.name) AS affected_requirements,
       score
ORDER BY score DESC",
            columns: &[
                Column::score("Score", "score"),
                Column::text("Defect", "defect_id"),
                Column::text("Status", "status"),
                Column::truncated("Description", "description", 40),
                Column::truncated("Affected", "affected_requirements", 40),
            ],
            empty_message: "(no defects of this severity match)",
        },
        text: "insulation and isolation failure",
        filter: Some(("severity", "Critical")),
    },
    SemanticQuery {
        query: CatalogQuery {
            title: "8. Multi-Hop \u{2014} Semantic Search \u{2192} Change Impact",
            description: "Requirements matching the query, then the changes affecting them.",
            cypher: "\
CALL db.index.vector.queryNodes('requirementEmbeddings', $top_k, $embedding)
YIELD node AS req, score
MATCH (ch:Change)-[:CHANGE_AFFECTS_REQ]->(req)
WITH req, score,
     collect(DISTINCT ch.change_proposal_id + ' ['
             + coalesce(ch.criticality, '?') + '/'
             + coalesce(ch.status, '?') + ']') AS changes
OPTIONAL MATCH (c:Component)-[:COMPONENT_HAS_REQ]->(req)
RETURN req.name AS requirement,
       c.name AS component,
       changes,
       score
ORDER BY score DESC",
            columns: &[
                Column::score("Score", "score"),
                Column::truncated("Requirement", "requirement", 28),
                Column::text("Component", "component"),
                Column::text("Changes", "changes"),
            ],
            empty_message: "(no matching requirements with change proposals)",
        },
        text: "charging system and power delivery",
        filter: None,
    },
];

/// Outcome of a test-query run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestQueryReport {
    pub passed: usize,
    pub total: usize,
}

async fn run_one(
    store: &dyn GraphStore,
    provider: &dyn EmbeddingProvider,
    semantic: &SemanticQuery,
    top_k: usize,
) -> Result<String> {
    let embedding = provider.embed_text(semantic.text).await?;
    let mut params = vec![
        ("embedding", QueryParam::Vector(embedding)),
        ("top_k", QueryParam::Int(top_k as i64)),
    ];
    if let Some((name, value)) = semantic.filter {
        params.push((name, QueryParam::Text(value.to_string())));
    }
    run_query(store, &semantic.query, &params).await
}

/// Run every test query. A failing query is reported and the run continues.
pub async fn run_test_queries(
    store: &dyn GraphStore,
    provider: &dyn EmbeddingProvider,
    top_k: usize,
    out: &mut (dyn Write + Send),
) -> Result<TestQueryReport> {
    write!(
        out,
        "{}",
        formatting::banner("Semantic Similarity & Hybrid Search \u{2014} Test Queries")
    )?;
    writeln!(out, "\n  Model: {}", provider.model_name())?;
    writeln!(out, "  Top-K: {}", top_k)?;

    let start = Instant::now();
    let mut passed = 0;
    for semantic in TEST_QUERIES {
        let query = &semantic.query;
        let description = match semantic.filter {
            Some((name, value)) => format!(
                "{}\n  Query: \"{}\" ({} = {})",
                query.description, semantic.text, name, value
            ),
            None => format!("{}\n  Query: \"{}\"", query.description, semantic.text),
        };
        write!(out, "{}", formatting::header(query.title, &description))?;
        write!(out, "{}", formatting::cypher(query.cypher))?;

        match run_one(store, provider, semantic, top_k).await {
            Ok(body) => {
                passed += 1;
                write!(out, "{}", body)?;
            }
            Err(e) => {
                warn!("{} failed: {:#}", query.title, e);
                write!(out, "  [FAIL] {:#}\n\n", e)?;
            }
        }
    }

    let report = TestQueryReport {
        passed,
        total: TEST_QUERIES.len(),
    };
    write!(
        out,
        "{}",
        formatting::banner(&format!(
            "{}/{} test queries completed in {:.1}s.",
            report.passed,
            report.total,
            start.elapsed().as_secs_f64()
        ))
    )?;
    Ok(report)
}
