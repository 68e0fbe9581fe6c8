// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::{NodeId, RoadmapId};
use super::prerequisite::PrerequisiteRef;

/// One curriculum graph: ordered topics plus directed prerequisite edges.
///
/// Display metadata (`title`, `description`, `icon`, `color`) is opaque to progress tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    id: RoadmapId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    connections: Vec<Connection>,
}

impl Roadmap {
    pub fn new(id: RoadmapId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            icon: String::new(),
            color: String::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_connection(mut self, from: NodeId, to: NodeId) -> Self {
        self.connections.push(Connection { from, to });
        self
    }

    pub fn id(&self) -> &RoadmapId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id.as_str() == node_id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.nodes.iter().map(|node| &node.id)
    }
}

/// One topic within a [`Roadmap`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: NodeId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    prerequisites: Vec<PrerequisiteRef>,
    #[serde(default)]
    resources: Vec<Resource>,
    #[serde(default)]
    estimated_time: String,
    #[serde(flatten)]
    position: Position,
}

impl Node {
    pub fn new(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category: String::new(),
            difficulty: Difficulty::default(),
            prerequisites: Vec::new(),
            resources: Vec::new(),
            estimated_time: String::new(),
            position: Position::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_prerequisite(mut self, prerequisite: PrerequisiteRef) -> Self {
        self.prerequisites.push(prerequisite);
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn prerequisites(&self) -> &[PrerequisiteRef] {
        &self.prerequisites
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn estimated_time(&self) -> &str {
        &self.estimated_time
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

/// Layout coordinates; only the presentation layer reads these.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Directed prerequisite edge: `from` is a prerequisite of `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

/// Learning material attached to a node.
///
/// Catalogs may list a resource either as a full object or as a bare title string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ResourceRepr")]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResourceKind>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,
}

impl Resource {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            kind: None,
            title: title.into(),
            url: None,
            description: None,
            author: None,
            is_free: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Video,
    Article,
    Book,
    #[serde(rename = "Official Docs")]
    OfficialDocs,
    #[serde(rename = "Interactive Tutorial")]
    InteractiveTutorial,
    #[serde(rename = "Project/Challenge")]
    ProjectChallenge,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Article => "Article",
            Self::Book => "Book",
            Self::OfficialDocs => "Official Docs",
            Self::InteractiveTutorial => "Interactive Tutorial",
            Self::ProjectChallenge => "Project/Challenge",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResourceRepr {
    Title(String),
    Full(ResourceJson),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceJson {
    #[serde(rename = "type", default)]
    kind: Option<ResourceKind>,
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    is_free: Option<bool>,
}

impl From<ResourceRepr> for Resource {
    fn from(repr: ResourceRepr) -> Self {
        match repr {
            ResourceRepr::Title(title) => Self::titled(title),
            ResourceRepr::Full(json) => Self {
                kind: json.kind,
                title: json.title,
                url: json.url,
                description: json.description,
                author: json.author,
                is_free: json.is_free,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Difficulty, Node, Resource, ResourceKind};

    #[test]
    fn node_deserializes_catalog_shape() {
        let node: Node = serde_json::from_str(
            r#"{
                "id": "classification",
                "title": "Classification Techniques",
                "description": "Learn supervised and unsupervised classification methods",
                "category": "Analysis",
                "difficulty": "Advanced",
                "prerequisites": ["image-processing", "photogrammetry/point-clouds"],
                "resources": ["Machine Learning in RS"],
                "estimatedTime": "5 weeks",
                "x": 200,
                "y": 400
            }"#,
        )
        .expect("parse node");

        assert_eq!(node.id().as_str(), "classification");
        assert_eq!(node.difficulty(), Difficulty::Advanced);
        assert_eq!(node.prerequisites().len(), 2);
        assert!(node.prerequisites()[0].is_local());
        assert!(!node.prerequisites()[1].is_local());
        assert_eq!(node.estimated_time(), "5 weeks");
        assert_eq!(node.position().x, 200.0);
        assert_eq!(node.position().y, 400.0);
    }

    #[test]
    fn resources_accept_bare_titles_and_full_objects() {
        let resources: Vec<Resource> = serde_json::from_str(
            r#"[
                "ERDAS Tutorial",
                {"type": "Official Docs", "title": "GDAL", "url": "https://gdal.org", "isFree": true}
            ]"#,
        )
        .expect("parse resources");

        assert_eq!(resources[0], Resource::titled("ERDAS Tutorial"));
        assert_eq!(resources[1].kind, Some(ResourceKind::OfficialDocs));
        assert_eq!(resources[1].url.as_deref(), Some("https://gdal.org"));
        assert_eq!(resources[1].is_free, Some(true));
    }
}
