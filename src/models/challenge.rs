// src/models/challenge.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// String form stored in the `difficulty` columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Flavour of a standard (option-based) challenge. Grading is identical for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardKind {
    Headline,
    Fallacy,
    Media,
    Source,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOption {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyWord {
    pub word: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub id: i64,
    pub claim: String,
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightTarget {
    pub text: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// The gradable part of a challenge, discriminated by `type`.
///
/// Stored as JSONB in `challenges.body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChallengeBody {
    Standard {
        kind: StandardKind,
        options: Vec<ChallengeOption>,
    },
    WordSelection {
        passage: String,
        key_words: Vec<KeyWord>,
    },
    Matching {
        pairs: Vec<MatchPair>,
    },
    Highlight {
        statement: String,
        highlights: Vec<HighlightTarget>,
    },
}

impl ChallengeBody {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Standard { .. } => "standard",
            Self::WordSelection { .. } => "word-selection",
            Self::Matching { .. } => "matching",
            Self::Highlight { .. } => "highlight",
        }
    }

    /// Checks that the body has at least one reachable correct answer.
    pub fn check_answerable(&self) -> Result<(), &'static str> {
        match self {
            Self::Standard { options, .. } => {
                if options.is_empty() {
                    return Err("options_cannot_be_empty");
                }
                if !options.iter().any(|o| o.is_correct) {
                    return Err("no_correct_option");
                }
                let ids: HashSet<i64> = options.iter().map(|o| o.id).collect();
                if ids.len() != options.len() {
                    return Err("duplicate_option_id");
                }
            }
            Self::WordSelection { passage, key_words } => {
                if key_words.is_empty() {
                    return Err("key_words_cannot_be_empty");
                }
                if key_words
                    .iter()
                    .any(|k| k.word.is_empty() || !passage.contains(&k.word))
                {
                    return Err("key_word_not_in_passage");
                }
            }
            Self::Matching { pairs } => {
                if pairs.is_empty() {
                    return Err("pairs_cannot_be_empty");
                }
                let ids: HashSet<i64> = pairs.iter().map(|p| p.id).collect();
                if ids.len() != pairs.len() {
                    return Err("duplicate_pair_id");
                }
            }
            Self::Highlight {
                statement,
                highlights,
            } => {
                if highlights.is_empty() {
                    return Err("highlights_cannot_be_empty");
                }
                if highlights
                    .iter()
                    .any(|h| h.text.is_empty() || !statement.contains(&h.text))
                {
                    return Err("highlight_not_in_statement");
                }
            }
        }
        Ok(())
    }

    /// Hides everything a learner could grade themselves with.
    pub fn to_public(&self) -> PublicBody {
        match self {
            Self::Standard { kind, options } => PublicBody::Standard {
                kind: *kind,
                multi_select: options.iter().filter(|o| o.is_correct).count() > 1,
                options: options
                    .iter()
                    .map(|o| PublicOption {
                        id: o.id,
                        text: o.text.clone(),
                    })
                    .collect(),
            },
            Self::WordSelection { passage, key_words } => PublicBody::WordSelection {
                passage: passage.clone(),
                key_word_count: key_words.len(),
            },
            Self::Matching { pairs } => {
                // Evidence is listed in text order so its position gives nothing away.
                let mut evidence: Vec<PublicEvidence> = pairs
                    .iter()
                    .map(|p| PublicEvidence {
                        id: p.id,
                        evidence: p.evidence.clone(),
                    })
                    .collect();
                evidence.sort_by(|a, b| a.evidence.cmp(&b.evidence));

                PublicBody::Matching {
                    claims: pairs
                        .iter()
                        .map(|p| PublicClaim {
                            id: p.id,
                            claim: p.claim.clone(),
                        })
                        .collect(),
                    evidence,
                }
            }
            Self::Highlight { statement, .. } => PublicBody::Highlight {
                statement: statement.clone(),
            },
        }
    }

    pub fn to_revealed(&self) -> RevealedAnswer {
        match self {
            Self::Standard { options, .. } => RevealedAnswer::Standard {
                correct_options: options.iter().filter(|o| o.is_correct).cloned().collect(),
            },
            Self::WordSelection { key_words, .. } => RevealedAnswer::WordSelection {
                key_words: key_words.clone(),
            },
            Self::Matching { pairs } => RevealedAnswer::Matching {
                pairs: pairs.clone(),
            },
            Self::Highlight { highlights, .. } => RevealedAnswer::Highlight {
                highlights: highlights.clone(),
            },
        }
    }
}

/// One gradable unit of a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: i64,
    pub journey_id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub xp_reward: i32,
    #[serde(flatten)]
    pub body: ChallengeBody,
}

impl Challenge {
    pub fn to_public(&self) -> PublicChallenge {
        PublicChallenge {
            id: self.id,
            journey_id: self.journey_id,
            title: self.title.clone(),
            description: self.description.clone(),
            difficulty: self.difficulty,
            xp_reward: self.xp_reward,
            body: self.body.to_public(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicOption {
    pub id: i64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicClaim {
    pub id: i64,
    pub claim: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicEvidence {
    pub id: i64,
    pub evidence: String,
}

/// DTO body for sending a challenge to the client (excludes answers and explanations).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PublicBody {
    Standard {
        kind: StandardKind,
        multi_select: bool,
        options: Vec<PublicOption>,
    },
    WordSelection {
        passage: String,
        key_word_count: usize,
    },
    Matching {
        claims: Vec<PublicClaim>,
        evidence: Vec<PublicEvidence>,
    },
    Highlight {
        statement: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicChallenge {
    pub id: i64,
    pub journey_id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub xp_reward: i32,
    #[serde(flatten)]
    pub body: PublicBody,
}

/// The solution of a challenge, shown after repeated wrong attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RevealedAnswer {
    Standard { correct_options: Vec<ChallengeOption> },
    WordSelection { key_words: Vec<KeyWord> },
    Matching { pairs: Vec<MatchPair> },
    Highlight { highlights: Vec<HighlightTarget> },
}

/// DTO for authoring a new challenge.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChallengeRequest {
    pub journey_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: String,
    pub difficulty: Difficulty,
    #[validate(range(min = 1, max = 1000))]
    pub xp_reward: i32,
    #[serde(flatten)]
    #[validate(custom(function = validate_body))]
    pub body: ChallengeBody,
}

fn validate_body(body: &ChallengeBody) -> Result<(), validator::ValidationError> {
    body.check_answerable()
        .map_err(validator::ValidationError::new)
}
