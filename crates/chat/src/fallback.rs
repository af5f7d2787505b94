//! Keyword fallback responder used when the model cannot answer.

/// Coaching topic recognised from a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Procrastination,
    Deadline,
    Focus,
    Motivation,
    BreakDown,
    Schedule,
    Distraction,
    General,
}

/// Keyword stems scanned in order; the first contained stem wins.
const KEYWORDS: &[(&str, Topic)] = &[
    ("procrastinat", Topic::Procrastination),
    ("deadline", Topic::Deadline),
    ("focus", Topic::Focus),
    ("motivat", Topic::Motivation),
    ("break down", Topic::BreakDown),
    ("schedule", Topic::Schedule),
    ("distract", Topic::Distraction),
];

impl Topic {
    /// Classify a message by the first keyword stem it contains.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map_or(Topic::General, |&(_, topic)| topic)
    }

    /// Canned coaching response for this topic.
    pub fn response(self) -> &'static str {
        match self {
            Topic::Procrastination => "I understand procrastination can be frustrating. Let's break this down: what specific task are you avoiding? I can help you create smaller, manageable steps that feel less overwhelming.",
            Topic::Deadline => "Deadlines can create pressure! Let me help you create a realistic timeline. When is your deadline, and what does your task involve? I'll help you work backwards to create a manageable schedule.",
            Topic::Focus => "Staying focused is a skill we can build together. Try the 25-minute Focus Sprint: work for 25 minutes, then take a 5-minute break. I can send you reminders to keep you on track!",
            Topic::Motivation => "Motivation comes and goes, but systems create consistency. Let's identify your 'why' for this task and create small wins that build momentum. What outcome are you hoping to achieve?",
            Topic::BreakDown => "Perfect! Let's break down your project step by step. First, tell me: What's the main goal of your project? Then we can identify the key milestones and create actionable tasks for each one.",
            Topic::Schedule => "Great idea! Let's create a realistic schedule. How much time do you typically have available each day? I'll help you optimize your schedule around your natural energy patterns.",
            Topic::Distraction => "The distraction blocker feature can help! Let's identify what's pulling your attention away and create strategies to minimize those interruptions during your focus time.",
            Topic::General => "That's a great point! Can you tell me more about what specific challenges you're facing? I'm here to provide personalized strategies that work for your situation.",
        }
    }
}

/// Answer a message without a model.
pub fn respond(message: &str) -> &'static str {
    Topic::classify(message).response()
}
