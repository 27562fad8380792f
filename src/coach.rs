use crate::models::TripEventTally;

/// Counters at or above this value are mentioned in coaching output.
pub const ISSUE_THRESHOLD: u32 = 2;

pub const OUTSTANDING_MESSAGE: &str =
    "Outstanding performance! You're setting a great example for safe driving.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Speeding,
    HardBrake,
    HardAccel,
    PhoneUse,
    HarshTurn,
}

pub struct IssueRule {
    pub kind: IssueKind,
    pub label: &'static str,
    pub phrase: &'static str,
    pub reading: fn(&TripEventTally) -> u32,
}

impl IssueRule {
    pub fn triggered(&self, events: &TripEventTally) -> bool {
        (self.reading)(events) >= ISSUE_THRESHOLD
    }
}

// Order matters: earlier rules win when tips are truncated.
pub static ISSUE_RULES: [IssueRule; 5] = [
    IssueRule {
        kind: IssueKind::Speeding,
        label: "speeding",
        phrase: "watch your speed and adhere to limits",
        reading: speeding,
    },
    IssueRule {
        kind: IssueKind::HardBrake,
        label: "hard braking",
        phrase: "avoid sudden braking by increasing following distance",
        reading: hard_brakes,
    },
    IssueRule {
        kind: IssueKind::HardAccel,
        label: "hard acceleration",
        phrase: "accelerate more smoothly to reduce risk",
        reading: hard_accels,
    },
    IssueRule {
        kind: IssueKind::PhoneUse,
        label: "phone use",
        phrase: "keep your phone down and stay focused",
        reading: phone_uses,
    },
    IssueRule {
        kind: IssueKind::HarshTurn,
        label: "harsh turning",
        phrase: "take corners more gently for stability",
        reading: harsh_turns,
    },
];

fn speeding(e: &TripEventTally) -> u32 {
    e.speeding_severity
}

fn hard_brakes(e: &TripEventTally) -> u32 {
    e.hard_brake_count
}

fn hard_accels(e: &TripEventTally) -> u32 {
    e.hard_accel_count
}

fn phone_uses(e: &TripEventTally) -> u32 {
    e.phone_use_count
}

fn harsh_turns(e: &TripEventTally) -> u32 {
    e.harsh_turn_count
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachTier {
    Outstanding,
    Good,
    OnTrack,
    Basics,
}

pub fn detected_issues(events: &TripEventTally) -> Vec<IssueKind> {
    triggered_rules(events).map(|rule| rule.kind).collect()
}

fn triggered_rules<'a>(
    events: &'a TripEventTally,
) -> impl Iterator<Item = &'static IssueRule> + 'a {
    ISSUE_RULES.iter().filter(move |rule| rule.triggered(events))
}

/// First-match tier selection. The two upper tiers also depend on how many
/// issues were detected, so a high score with several issues drops down.
pub fn select_tier(score: f64, issue_count: usize) -> CoachTier {
    let score = sanitize_score(score);
    if score >= 8.0 && issue_count == 0 {
        CoachTier::Outstanding
    } else if score >= 7.0 && issue_count <= 1 {
        CoachTier::Good
    } else if score >= 5.0 {
        CoachTier::OnTrack
    } else {
        CoachTier::Basics
    }
}

pub fn coaching_message(events: &TripEventTally, score: f64) -> String {
    let phrases: Vec<&'static str> = triggered_rules(events).map(|rule| rule.phrase).collect();
    let tier = select_tier(score, phrases.len());
    tracing::debug!(score, ?tier, issues = phrases.len(), "coaching message selected");

    match tier {
        CoachTier::Outstanding => OUTSTANDING_MESSAGE.to_string(),
        CoachTier::Good => match phrases.first() {
            Some(phrase) => format!("Good overall driving! Tip: {}.", capitalize(phrase)),
            None => "Good overall driving! Keep it up!".to_string(),
        },
        CoachTier::OnTrack => match join_tips(&phrases, 2) {
            Some(tip) => format!("You're on the right track. {tip}."),
            None => "You're on the right track. Keep improving your smoothness and awareness."
                .to_string(),
        },
        CoachTier::Basics => match join_tips(&phrases, 3) {
            Some(tip) => format!("Let's focus on the basics: {tip}."),
            None => "Let's focus on consistent, smooth inputs and staying attentive.".to_string(),
        },
    }
}

fn join_tips(phrases: &[&str], limit: usize) -> Option<String> {
    if phrases.is_empty() {
        return None;
    }
    let tips: Vec<String> = phrases.iter().take(limit).map(|p| capitalize(p)).collect();
    Some(tips.join(". "))
}

fn sanitize_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 10.0)
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
