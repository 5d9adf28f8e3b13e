//! Static reference data for the SAA-C03 exam: domains with their weights, the
//! AWS service catalog, and the available study modes.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const EXAM_NAME: &str = "AWS Certified Solutions Architect - Associate (SAA-C03)";

/// Top-level exam domain.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Domain {
    #[default]
    #[serde(rename = "Design Secure Architectures")]
    SecureArchitectures,
    #[serde(rename = "Design Resilient Architectures")]
    ResilientArchitectures,
    #[serde(rename = "Design High-Performing Architectures")]
    HighPerformingArchitectures,
    #[serde(rename = "Design Cost-Optimized Architectures")]
    CostOptimizedArchitectures,
}

impl Domain {
    /// All domains in exam-guide order.
    pub const ALL: [Domain; 4] = [
        Domain::SecureArchitectures,
        Domain::ResilientArchitectures,
        Domain::HighPerformingArchitectures,
        Domain::CostOptimizedArchitectures,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Domain::SecureArchitectures => "Design Secure Architectures",
            Domain::ResilientArchitectures => "Design Resilient Architectures",
            Domain::HighPerformingArchitectures => "Design High-Performing Architectures",
            Domain::CostOptimizedArchitectures => "Design Cost-Optimized Architectures",
        }
    }

    /// Percentage of the exam covered by this domain.
    pub fn weight(self) -> u8 {
        match self {
            Domain::SecureArchitectures => 30,
            Domain::ResilientArchitectures => 26,
            Domain::HighPerformingArchitectures => 24,
            Domain::CostOptimizedArchitectures => 20,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key AWS services covered by the certification guide.
pub const AWS_SERVICES: [&str; 17] = [
    "Amazon EC2",
    "Amazon S3",
    "Amazon VPC",
    "Amazon RDS",
    "Amazon DynamoDB",
    "AWS Lambda",
    "Amazon CloudFront",
    "Amazon Route 53",
    "Elastic Load Balancing",
    "AWS IAM",
    "Amazon CloudWatch",
    "AWS CloudTrail",
    "Amazon SNS",
    "Amazon SQS",
    "AWS Direct Connect",
    "Amazon API Gateway",
    "AWS CloudFormation",
];

pub fn is_known_service(name: &str) -> bool {
    AWS_SERVICES.contains(&name)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudyMode {
    #[default]
    #[serde(rename = "Quick Quiz")]
    QuickQuiz,
    #[serde(rename = "Concept Explanation")]
    ConceptExplanation,
    #[serde(rename = "Service Deep Dive")]
    ServiceDeepDive,
    #[serde(rename = "Practice Question")]
    PracticeQuestion,
    #[serde(rename = "Flashcards")]
    Flashcards,
}

impl StudyMode {
    pub const ALL: [StudyMode; 5] = [
        StudyMode::QuickQuiz,
        StudyMode::ConceptExplanation,
        StudyMode::ServiceDeepDive,
        StudyMode::PracticeQuestion,
        StudyMode::Flashcards,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StudyMode::QuickQuiz => "Quick Quiz",
            StudyMode::ConceptExplanation => "Concept Explanation",
            StudyMode::ServiceDeepDive => "Service Deep Dive",
            StudyMode::PracticeQuestion => "Practice Question",
            StudyMode::Flashcards => "Flashcards",
        }
    }

    /// Label of the mode's generate button; `None` for free-text chat modes.
    pub fn action_label(self) -> Option<&'static str> {
        match self {
            StudyMode::QuickQuiz => Some("Generate Quick Quiz Question"),
            StudyMode::PracticeQuestion => Some("Generate Practice Question"),
            StudyMode::Flashcards => Some("Generate Flashcard"),
            StudyMode::ConceptExplanation | StudyMode::ServiceDeepDive => None,
        }
    }

    pub fn accepts_chat_input(self) -> bool {
        self.action_label().is_none()
    }

    pub fn uses_service(self) -> bool {
        self == StudyMode::ServiceDeepDive
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
