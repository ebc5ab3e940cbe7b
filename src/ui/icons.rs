use crate::search::SearchHit;

pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const GEAR: &str = "⚙️";
    pub const DIAGRAM: &str = "🗺️";
    pub const CLASSIFIER: &str = "📦";
    pub const FEATURE: &str = "🔹";
    pub const RELATIONSHIP: &str = "🔗";
}

impl Icons {
    /// Icon of the entity kind a hit refers to
    pub fn for_hit(hit: &SearchHit) -> &'static str {
        match hit {
            SearchHit::Diagram { .. } => Self::DIAGRAM,
            SearchHit::Classifier { .. } => Self::CLASSIFIER,
            SearchHit::Feature { .. } => Self::FEATURE,
            SearchHit::Relationship { .. } => Self::RELATIONSHIP,
        }
    }
}
