// src/store/seed.rs

//! Starter content so a fresh install has one playable journey.

use super::{Store, StoreError};
use crate::models::{
    challenge::{
        ChallengeBody, ChallengeOption, CreateChallengeRequest, Difficulty, HighlightTarget,
        KeyWord, MatchPair, StandardKind,
    },
    journey::{CreateJourneyRequest, Journey},
};

fn option(id: i64, text: &str, is_correct: bool, explanation: &str) -> ChallengeOption {
    ChallengeOption {
        id,
        text: text.to_string(),
        is_correct,
        explanation: Some(explanation.to_string()),
    }
}

pub fn demo_journey() -> CreateJourneyRequest {
    CreateJourneyRequest {
        title: "Spotting Manipulation".to_string(),
        description: "Learn to recognise loaded language, weak evidence and faulty reasoning."
            .to_string(),
        difficulty: Difficulty::Beginner,
    }
}

/// One challenge of every kind, attached to `journey_id`.
pub fn demo_challenges(journey_id: i64) -> Vec<CreateChallengeRequest> {
    vec![
        CreateChallengeRequest {
            journey_id,
            title: "Clickbait or news?".to_string(),
            description: "Which headline is written to provoke rather than inform?".to_string(),
            difficulty: Difficulty::Beginner,
            xp_reward: 10,
            body: ChallengeBody::Standard {
                kind: StandardKind::Headline,
                options: vec![
                    option(1, "City council approves new bus routes", false, "Plain and factual."),
                    option(
                        2,
                        "You won't BELIEVE what the council just did to your commute",
                        true,
                        "Curiosity gap and emotional capitals.",
                    ),
                    option(3, "Bus fares unchanged for 2025", false, "States a fact."),
                ],
            },
        },
        CreateChallengeRequest {
            journey_id,
            title: "Name the fallacies".to_string(),
            description: "\"Everyone I know agrees, and you're just jealous anyway.\" Pick every fallacy."
                .to_string(),
            difficulty: Difficulty::Intermediate,
            xp_reward: 15,
            body: ChallengeBody::Standard {
                kind: StandardKind::Fallacy,
                options: vec![
                    option(1, "Bandwagon", true, "\"Everyone I know agrees\" appeals to popularity."),
                    option(2, "Ad hominem", true, "\"You're just jealous\" attacks the person."),
                    option(3, "Slippery slope", false, "No chain of consequences is claimed."),
                ],
            },
        },
        CreateChallengeRequest {
            journey_id,
            title: "Loaded words".to_string(),
            description: "Click the words chosen to make you feel rather than think.".to_string(),
            difficulty: Difficulty::Beginner,
            xp_reward: 15,
            body: ChallengeBody::WordSelection {
                passage: "The radical proposal will destroy our peaceful town".to_string(),
                key_words: vec![
                    KeyWord {
                        word: "radical".to_string(),
                        explanation: Some("Labels the idea as extreme without argument.".to_string()),
                    },
                    KeyWord {
                        word: "destroy".to_string(),
                        explanation: Some("Exaggerates the consequence.".to_string()),
                    },
                ],
            },
        },
        CreateChallengeRequest {
            journey_id,
            title: "Claims and their support".to_string(),
            description: "Match each claim with the evidence actually offered for it.".to_string(),
            difficulty: Difficulty::Intermediate,
            xp_reward: 20,
            body: ChallengeBody::Matching {
                pairs: vec![
                    MatchPair {
                        id: 1,
                        claim: "This supplement boosts memory".to_string(),
                        evidence: "A testimonial from a paid influencer".to_string(),
                    },
                    MatchPair {
                        id: 2,
                        claim: "Seat belts reduce road deaths".to_string(),
                        evidence: "Decades of national crash statistics".to_string(),
                    },
                    MatchPair {
                        id: 3,
                        claim: "Our town is the friendliest".to_string(),
                        evidence: "An online poll on the town's own website".to_string(),
                    },
                ],
            },
        },
        CreateChallengeRequest {
            journey_id,
            title: "Find the leap".to_string(),
            description: "Highlight the part of the sentence that does not follow from the evidence."
                .to_string(),
            difficulty: Difficulty::Advanced,
            xp_reward: 10,
            body: ChallengeBody::Highlight {
                statement: "Nine out of ten dentists recommend brushing daily, so this must be the best toothpaste."
                    .to_string(),
                highlights: vec![HighlightTarget {
                    text: "so this must be the best toothpaste".to_string(),
                    explanation: Some("General advice is stretched into a product claim.".to_string()),
                }],
            },
        },
    ]
}

/// Seeds the demo journey when the store has no journeys yet.
pub async fn seed_demo(store: &dyn Store) -> Result<Option<Journey>, StoreError> {
    if !store.list_journeys().await?.is_empty() {
        return Ok(None);
    }

    let journey = store.create_journey(&demo_journey()).await?;
    for challenge in demo_challenges(journey.id) {
        store.create_challenge(&challenge).await?;
    }
    tracing::info!("Seeded demo journey '{}'.", journey.title);

    Ok(Some(journey))
}
