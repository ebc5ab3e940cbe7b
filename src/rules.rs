//! Visibility rules
//!
//! Decides which features and relationships a diagram shows. Scenario diagrams
//! (sequence, communication, timing, interaction overview) only show lifelines
//! and the messages between them; structural diagrams show features and
//! relationships of their classifiers unconditionally, unless the diagram or
//! classifier kind hides them.

use crate::classifier::ClassifierType;
use crate::diagram::DiagramType;
use crate::feature::FeatureType;

/// Policy consulted by the text search and by anything that displays features.
pub trait VisibilityRules {
    /// True for diagram kinds that depict one interaction scenario
    fn diagram_is_scenario(&self, diagram_type: DiagramType) -> bool;

    /// True for feature kinds that only exist within a scenario (lifelines)
    fn feature_is_scenario(&self, feature_type: FeatureType) -> bool;

    fn classifier_shows_uncond_features(&self, classifier_type: ClassifierType) -> bool;

    fn diagram_shows_uncond_features(&self, diagram_type: DiagramType) -> bool;

    fn diagram_shows_uncond_relationships(&self, diagram_type: DiagramType) -> bool;
}

/// The rule set used throughout the application.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataRules;

impl DataRules {
    pub fn new() -> Self {
        Self
    }
}

impl VisibilityRules for DataRules {
    fn diagram_is_scenario(&self, diagram_type: DiagramType) -> bool {
        matches!(
            diagram_type,
            DiagramType::Sequence
                | DiagramType::Communication
                | DiagramType::Timing
                | DiagramType::InteractionOverview
        )
    }

    fn feature_is_scenario(&self, feature_type: FeatureType) -> bool {
        feature_type == FeatureType::Lifeline
    }

    fn classifier_shows_uncond_features(&self, classifier_type: ClassifierType) -> bool {
        !matches!(
            classifier_type,
            ClassifierType::Actor
                | ClassifierType::Comment
                | ClassifierType::Image
                | ClassifierType::Interaction
                | ClassifierType::DiagramReference
                | ClassifierType::SubsystemBoundary
        )
    }

    fn diagram_shows_uncond_features(&self, diagram_type: DiagramType) -> bool {
        let hidden = matches!(diagram_type, DiagramType::List | DiagramType::Box)
            || self.diagram_is_scenario(diagram_type);
        !hidden
    }

    fn diagram_shows_uncond_relationships(&self, diagram_type: DiagramType) -> bool {
        let hidden = diagram_type == DiagramType::List || self.diagram_is_scenario(diagram_type);
        !hidden
    }
}
