//! The manufacturing product development schema.
//!
//! Table order matters: nodes load top to bottom, then relationships, so
//! every relationship row can MATCH endpoints that already exist.

use crate::neo4j::models::*;

const fn text(property: &'static str, column: &'static str) -> PropertyMapping {
    PropertyMapping::text(property, column)
}

const fn property(label: &'static str, property: &'static str) -> PropertyRef {
    PropertyRef { label, property }
}

const fn endpoint(label: &'static str, key: &'static str) -> Endpoint {
    Endpoint {
        label,
        key,
        column: key,
    }
}

pub const NODE_TABLES: &[NodeSpec] = &[
    NodeSpec {
        label: "Product",
        file: "products.csv",
        key: text("product_id", "product_id"),
        properties: &[
            text("name", "Product Name"),
            text("description", "Description"),
        ],
    },
    NodeSpec {
        label: "TechnologyDomain",
        file: "technology_domains.csv",
        key: text("technology_domain_id", "technology_domain_id"),
        properties: &[text("name", "Technology Domain")],
    },
    NodeSpec {
        label: "Component",
        file: "components.csv",
        key: text("component_id", "component_id"),
        properties: &[
            text("name", "Component"),
            text("description", "Component Description"),
        ],
    },
    NodeSpec {
        label: "Requirement",
        file: "requirements.csv",
        key: text("requirement_id", "requirement_id"),
        properties: &[
            text("name", "Requirement"),
            text("description", "Description"),
            text("name_de", "Anforderung"),
            text("description_de", "Beschreibung"),
            text("vehicle_project", "Vehicle Project"),
            text("technology_cluster", "Technology Cluster"),
            text("component", "Component"),
            text("type", "Type"),
        ],
    },
    NodeSpec {
        label: "TestSet",
        file: "test_sets.csv",
        key: text("test_set_id", "test_set_id"),
        properties: &[text("name", "Test Set")],
    },
    NodeSpec {
        label: "TestCase",
        file: "test_cases.csv",
        key: text("test_case_id", "Test Case ID"),
        properties: &[
            text("name", "Test Case"),
            text("status", "Test Status"),
            text("resources", "Resources"),
            PropertyMapping::float("duration_hours", "Test Duration (hours)"),
            text("start_date", "Start Date"),
            text("end_date", "End Date"),
            text("responsibility", "Responsibility"),
            text("i_stage", "I-Stage"),
        ],
    },
    NodeSpec {
        label: "Defect",
        file: "defects.csv",
        key: text("defect_id", "defect_id"),
        properties: &[
            text("description", "Description"),
            text("severity", "Severity"),
            text("priority", "Priority"),
            text("assigned_to", "Assigned To"),
            text("status", "Status"),
            text("creation_date", "Creation Date"),
            text("resolved_date", "Resolved Date"),
            text("resolution", "Resolution"),
            text("comments", "Comments"),
        ],
    },
    NodeSpec {
        label: "Change",
        file: "changes.csv",
        key: text("change_proposal_id", "change_proposal_id"),
        properties: &[
            text("description", "Description"),
            text("criticality", "Criticality"),
            text("dev_cost_usd", "Development Cost in USD"),
            text(
                "production_cost_usd_per_unit",
                "Production Cost in USD per unit",
            ),
            text("status", "Status"),
            text("urgency", "Urgency"),
            text("risk", "Risk"),
        ],
    },
    NodeSpec {
        label: "Milestone",
        file: "milestones.csv",
        key: text("milestone_id", "milestone_id"),
        properties: &[text("deadline", "Deadline")],
    },
];

/// MaturityLevel and Resource nodes come from TestCase values, not files.
pub const DERIVED: &[DerivedSpec] = &[
    DerivedSpec {
        label: "MaturityLevel",
        key: "name",
        source_label: "TestCase",
        source_property: "i_stage",
        rel_type: "REQUIRES_ML",
    },
    DerivedSpec {
        label: "Resource",
        key: "name",
        source_label: "TestCase",
        source_property: "resources",
        rel_type: "REQUIRES",
    },
];

pub const RELATIONSHIP_TABLES: &[RelationshipSpec] = &[
    RelationshipSpec {
        rel_type: "PRODUCT_HAS_DOMAIN",
        file: "product_technology_domains.csv",
        from: endpoint("Product", "product_id"),
        to: endpoint("TechnologyDomain", "technology_domain_id"),
        properties: &[],
    },
    RelationshipSpec {
        rel_type: "DOMAIN_HAS_COMPONENT",
        file: "technology_domains_components.csv",
        from: endpoint("TechnologyDomain", "technology_domain_id"),
        to: endpoint("Component", "component_id"),
        properties: &[],
    },
    RelationshipSpec {
        rel_type: "COMPONENT_HAS_REQ",
        file: "components_requirements.csv",
        from: endpoint("Component", "component_id"),
        to: endpoint("Requirement", "requirement_id"),
        properties: &[],
    },
    RelationshipSpec {
        rel_type: "TESTED_WITH",
        file: "requirements_test_sets.csv",
        from: endpoint("Requirement", "requirement_id"),
        to: endpoint("TestSet", "test_set_id"),
        properties: &[],
    },
    RelationshipSpec {
        rel_type: "CONTAINS_TEST_CASE",
        file: "test_sets_test_cases.csv",
        from: endpoint("TestSet", "test_set_id"),
        to: endpoint("TestCase", "test_case_id"),
        properties: &[],
    },
    RelationshipSpec {
        rel_type: "DETECTED",
        file: "test_case_defect.csv",
        from: endpoint("TestCase", "test_case_id"),
        to: endpoint("Defect", "defect_id"),
        properties: &[],
    },
    RelationshipSpec {
        rel_type: "CHANGE_AFFECTS_REQ",
        file: "changes_requirements.csv",
        from: endpoint("Change", "change_proposal_id"),
        to: endpoint("Requirement", "requirement_id"),
        properties: &[],
    },
    // Both of the next two come from one file: the milestone a requirement
    // gates, and the test set that must pass flawlessly for it.
    RelationshipSpec {
        rel_type: "REQUIRES_ML",
        file: "requirements_test_sets_milestone.csv",
        from: endpoint("Requirement", "requirement_id"),
        to: endpoint("Milestone", "milestone_id"),
        properties: &[],
    },
    RelationshipSpec {
        rel_type: "REQUIRES_FLAWLESS_TEST_SET",
        file: "requirements_test_sets_milestone.csv",
        from: endpoint("Requirement", "requirement_id"),
        to: endpoint("TestSet", "test_set_id"),
        properties: &[text("milestone_id", "milestone_id")],
    },
];

/// Milestone ids (m_100, m_200, ...) sort chronologically; the M/D/YY
/// deadline strings do not.
pub const MILESTONE_CHAIN: ChainSpec = ChainSpec {
    label: "Milestone",
    order_by: "milestone_id",
    rel_type: "NEXT",
};

pub const CONSTRAINTS: &[PropertyRef] = &[
    property("Product", "product_id"),
    property("TechnologyDomain", "technology_domain_id"),
    property("Component", "component_id"),
    property("Requirement", "requirement_id"),
    property("TestSet", "test_set_id"),
    property("TestCase", "test_case_id"),
    property("Defect", "defect_id"),
    property("Change", "change_proposal_id"),
    property("Milestone", "milestone_id"),
    property("MaturityLevel", "name"),
    property("Resource", "name"),
];

pub const PROPERTY_INDEXES: &[PropertyRef] = &[
    property("Requirement", "type"),
    property("TestCase", "status"),
    property("Defect", "severity"),
    property("Defect", "status"),
    property("Change", "status"),
];

pub const VECTOR_INDEXES: &[VectorIndexSpec] = &[
    VectorIndexSpec {
        name: "requirementEmbeddings",
        label: "Requirement",
        property: "embedding",
    },
    VectorIndexSpec {
        name: "defectEmbeddings",
        label: "Defect",
        property: "embedding",
    },
];

/// Backfill order: requirements first, then defects.
pub const EMBEDDING_TARGETS: &[EmbeddingTarget] = &[
    EmbeddingTarget {
        label: "Requirement",
        id_property: "requirement_id",
        text_property: "description",
    },
    EmbeddingTarget {
        label: "Defect",
        id_property: "defect_id",
        text_property: "description",
    },
];

/// Every label the verifier reports on, file-backed then derived.
pub fn node_labels() -> Vec<&'static str> {
    NODE_TABLES
        .iter()
        .map(|t| t.label)
        .chain(DERIVED.iter().map(|d| d.label))
        .collect()
}

pub fn node_table(label: &str) -> Option<&'static NodeSpec> {
    NODE_TABLES.iter().find(|t| t.label == label)
}

pub fn relationship_table(rel_type: &str) -> Option<&'static RelationshipSpec> {
    RELATIONSHIP_TABLES.iter().find(|t| t.rel_type == rel_type)
}
