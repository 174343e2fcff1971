//! Sample queries over the loaded graph
//!
//! All read-only. The two similarity samples reuse stored embeddings, so
//! no embedding provider is needed.

use super::{formatting, run_query, CatalogQuery, Column};
use crate::neo4j::{GraphStore, QueryParam};
use anyhow::Result;
use std::io::Write;
use tracing::warn;

pub struct Sample {
    pub query: CatalogQuery,
    /// When set, a failing query prints this instead of aborting the run
    pub on_failure: Option<&'static str>,
}

pub const SAMPLES: &[Sample] = &[
    Sample {
        query: CatalogQuery {
            title: "1. Product Overview",
            description: "Each Product with its Technology Domains and Component counts.",
            cypher: "\
MATCH (p:Product)-[:PRODUCT_HAS_DOMAIN]->(td:TechnologyDomain)
OPTIONAL MATCH (td)-[:DOMAIN_HAS_COMPONENT]->(c:Component)
WITH p, td, count(DISTINCT c) AS components
ORDER BY td.name
WITH p, collect(td.name + ' (' + toString(components) + ' components)') AS domains
RETURN p.name AS product, p.description AS description, domains
ORDER BY product",
            columns: &[
                Column::text("Product", "product"),
                Column::truncated("Description", "description", 30),
                Column::text("Domains", "domains"),
            ],
            empty_message: "(no results)",
        },
        on_failure: None,
    },
    Sample {
        query: CatalogQuery {
            title: "2. Requirement Traceability",
            description:
                "Requirements traced from Component through TestSets, TestCases, to Defects.",
            cypher: "\
MATCH (c:Component)-[:COMPONENT_HAS_REQ]->(r:Requirement)
OPTIONAL MATCH (r)-[:TESTED_WITH]->(ts:TestSet)
OPTIONAL MATCH (ts)-[:CONTAINS_TEST_CASE]->(tc:TestCase)
OPTIONAL MATCH (tc)-[:DETECTED]->(d:Defect)
WITH c.name AS component, r.name AS requirement, r.type AS type,
     count(DISTINCT ts) AS test_sets, count(DISTINCT tc) AS test_cases,
     count(DISTINCT d) AS defects
RETURN component, requirement, type, test_sets, test_cases, defects
ORDER BY defects DESC, component, requirement
LIMIT $limit",
            columns: &[
                Column::text("Component", "component"),
                Column::truncated("Requirement", "requirement", 25),
                Column::text("Type", "type"),
                Column::text("TestSets", "test_sets"),
                Column::text("TestCases", "test_cases"),
                Column::text("Defects", "defects"),
            ],
            empty_message: "(no results)",
        },
        on_failure: None,
    },
    Sample {
        query: CatalogQuery {
            title: "3. Change Impact Analysis",
            description: "Change proposals with the requirements and test sets they affect.",
            cypher: "\
MATCH (ch:Change)-[:CHANGE_AFFECTS_REQ]->(r:Requirement)
OPTIONAL MATCH (r)-[:TESTED_WITH]->(ts:TestSet)
WITH ch, r, collect(DISTINCT ts.name) AS affected_test_sets
RETURN ch.change_proposal_id AS change_id,
       ch.criticality AS criticality,
       ch.status AS status,
       r.name AS requirement,
       affected_test_sets
ORDER BY ch.change_proposal_id
LIMIT $limit",
            columns: &[
                Column::text("Change", "change_id"),
                Column::text("Criticality", "criticality"),
                Column::text("Status", "status"),
                Column::truncated("Requirement", "requirement", 40),
                Column::text("Test Sets", "affected_test_sets"),
            ],
            empty_message: "(no results)",
        },
        on_failure: None,
    },
    Sample {
        query: CatalogQuery {
            title: "4. Milestone Timeline",
            description: "Milestones by deadline with requirement counts and NEXT links.",
            // Deadlines are M/D/YY strings; sort on the parsed date
            cypher: "\
MATCH (m:Milestone)
WHERE m.deadline IS NOT NULL
OPTIONAL MATCH (r:Requirement)-[:REQUIRES_ML]->(m)
WITH m, count(r) AS requirements, split(m.deadline, '/') AS parts
WITH m, requirements,
     toInteger(parts[2]) AS year, toInteger(parts[0]) AS month, toInteger(parts[1]) AS day
WITH m, requirements,
     (CASE WHEN year < 100 THEN 2000 + year ELSE year END) * 10000
         + month * 100 + day AS due
OPTIONAL MATCH (m)-[:NEXT]->(next:Milestone)
RETURN m.milestone_id AS milestone, m.deadline AS deadline,
       requirements, next.milestone_id AS next_milestone
ORDER BY due, milestone
LIMIT $limit",
            columns: &[
                Column::text("Milestone", "milestone"),
                Column::text("Deadline", "deadline"),
                Column::text("Requirements", "requirements"),
                Column::text("Next", "next_milestone"),
            ],
            empty_message: "(no results)",
        },
        on_failure: None,
    },
    Sample {
        query: CatalogQuery {
            title: "5. Defect Summary",
            description: "Defects traced back through TestCase \u{2192} TestSet \u{2192} \
                          Requirement \u{2192} Component.",
            cypher: "\
MATCH (tc:TestCase)-[:DETECTED]->(d:Defect)
OPTIONAL MATCH (ts:TestSet)-[:CONTAINS_TEST_CASE]->(tc)
OPTIONAL MATCH (r:Requirement)-[:TESTED_WITH]->(ts)
OPTIONAL MATCH (c:Component)-[:COMPONENT_HAS_REQ]->(r)
RETURN d.defect_id AS defect_id, d.description AS description,
       d.severity AS severity, d.status AS status,
       collect(DISTINCT c.name) AS components
ORDER BY d.severity, d.defect_id
LIMIT $limit",
            columns: &[
                Column::text("Defect", "defect_id"),
                Column::text("Severity", "severity"),
                Column::text("Status", "status"),
                Column::truncated("Description", "description", 40),
                Column::text("Components", "components"),
            ],
            empty_message: "(no results)",
        },
        on_failure: None,
    },
    Sample {
        query: CatalogQuery {
            title: "6. Test Coverage",
            description: "Requirements with their test case counts by status.",
            cypher: "\
MATCH (r:Requirement)
OPTIONAL MATCH (r)-[:TESTED_WITH]->(ts:TestSet)-[:CONTAINS_TEST_CASE]->(tc:TestCase)
WITH r,
     count(DISTINCT tc) AS total_cases,
     count(DISTINCT CASE WHEN tc.status = 'Passed' THEN tc END) AS passed,
     count(DISTINCT CASE WHEN tc.status = 'Failed' THEN tc END) AS failed,
     count(DISTINCT CASE WHEN tc.status = 'Planned' THEN tc END) AS planned
RETURN r.requirement_id AS req_id, r.name AS requirement,
       total_cases, passed, failed, planned
ORDER BY failed DESC, planned DESC, r.requirement_id
LIMIT $limit",
            columns: &[
                Column::text("Req ID", "req_id"),
                Column::truncated("Requirement", "requirement", 25),
                Column::text("Total", "total_cases"),
                Column::text("Passed", "passed"),
                Column::text("Failed", "failed"),
                Column::text("Planned", "planned"),
            ],
            empty_message: "(no results)",
        },
        on_failure: None,
    },
    Sample {
        query: CatalogQuery {
            title: "7. Semantic Search: Requirements",
            description: "A random requirement and its nearest neighbours.",
            cypher: "\
MATCH (seed:Requirement)
WHERE seed.embedding IS NOT NULL
WITH seed, rand() AS r ORDER BY r LIMIT 1
CALL db.index.vector.queryNodes('requirementEmbeddings', $top_k, seed.embedding)
YIELD node, score
WHERE node <> seed
WITH seed, node, score ORDER BY score DESC LIMIT $limit
RETURN seed.name AS seed_name,
       score AS similarity,
       node.name AS match_name,
       node.description AS match_desc",
            columns: &[
                Column::text("Seed", "seed_name"),
                Column::score("Score", "similarity"),
                Column::text("Similar requirement", "match_name"),
                Column::truncated("Description", "match_desc", 45),
            ],
            empty_message: "(no requirements with embeddings \u{2014} run 'load' first)",
        },
        on_failure: Some("(vector index not available \u{2014} run 'load' first)"),
    },
    Sample {
        query: CatalogQuery {
            title: "8. Semantic Search: Defects",
            description: "A random defect and its nearest neighbours in defectEmbeddings.",
            cypher: "\
MATCH (seed:Defect)
WHERE seed.embedding IS NOT NULL
WITH seed, rand() AS r ORDER BY r LIMIT 1
CALL db.index.vector.queryNodes('defectEmbeddings', $top_k, seed.embedding)
YIELD node, score
WHERE node <> seed
WITH seed, node, score ORDER BY score DESC LIMIT $limit
RETURN seed.defect_id AS seed_id,
       score AS similarity,
       node.defect_id AS match_id,
       node.description AS match_desc",
            columns: &[
                Column::text("Seed", "seed_id"),
                Column::score("Score", "similarity"),
                Column::text("Similar defect", "match_id"),
                Column::truncated("Description", "match_desc", 50),
            ],
            empty_message: "(no defects with embeddings \u{2014} run 'load' first)",
        },
        on_failure: Some("(vector index not available \u{2014} run 'load' first)"),
    },
];

/// `limit` caps every sample but the product overview; similarity samples
/// ask for one extra neighbour because the seed itself is the closest match.
pub fn sample_params(sample_size: usize) -> Vec<(&'static str, QueryParam)> {
    let limit = sample_size as i64;
    vec![
        ("limit", QueryParam::Int(limit)),
        ("top_k", QueryParam::Int(limit + 1)),
    ]
}

/// Run every sample, writing each section as it completes.
pub async fn run_samples(
    store: &dyn GraphStore,
    sample_size: usize,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    write!(
        out,
        "{}",
        formatting::banner("Manufacturing Product Development \u{2014} Sample Queries")
    )?;
    writeln!(out, "\n  Sample size: {} rows per section", sample_size)?;

    let params = sample_params(sample_size);
    for sample in SAMPLES {
        let query = &sample.query;
        write!(out, "{}", formatting::header(query.title, query.description))?;
        write!(out, "{}", formatting::cypher(query.cypher))?;

        let body = match run_query(store, query, &params).await {
            Ok(body) => body,
            Err(e) => match sample.on_failure {
                Some(message) => {
                    warn!("{} failed: {:#}", query.title, e);
                    format!("  {}\n\n", message)
                }
                None => return Err(e),
            },
        };
        write!(out, "{}", body)?;
    }

    write!(out, "{}", formatting::banner("All samples complete."))?;
    Ok(())
}
