//! Reward message composition.

use std::fmt;

/// Thank-you text used when none is configured.
pub const DEFAULT_THANK_YOU: &str = "Thanks for the super helpful review and great feedback! 🙌";
/// Points granted when none are configured.
pub const DEFAULT_POINTS: u32 = 5;
/// Company value hashtag used when none is configured.
pub const DEFAULT_TAG: &str = "focus-on-continuous-improvement";

/// Static parts of every reward message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    thank_you: String,
    points: u32,
    tag: String,
}

impl MessageTemplate {
    /// Creates a template. A leading `#` on the tag is ignored.
    #[must_use]
    pub fn new(thank_you: impl Into<String>, points: u32, tag: &str) -> Self {
        Self {
            thank_you: thank_you.into().trim().to_owned(),
            points,
            tag: tag.trim().trim_start_matches('#').to_owned(),
        }
    }

    /// Points granted per message.
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.points
    }

    /// Builds the message mentioning each handle in order.
    #[must_use]
    pub fn compose<S: AsRef<str>>(&self, handles: &[S]) -> RewardMessage {
        let mentions: Vec<String> = handles
            .iter()
            .map(|handle| format!("@{}", handle.as_ref()))
            .collect();
        let suffix = format!("{} +{} #{}", self.thank_you, self.points, self.tag);
        let text = if mentions.is_empty() {
            suffix
        } else {
            format!("{} {suffix}", mentions.join(" "))
        };
        RewardMessage {
            text,
            mentions: mentions.len(),
        }
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_THANK_YOU, DEFAULT_POINTS, DEFAULT_TAG)
    }
}

/// A composed reward message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardMessage {
    text: String,
    mentions: usize,
}

impl RewardMessage {
    /// The text sent as the bonus reason.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of handles mentioned.
    #[must_use]
    pub const fn mention_count(&self) -> usize {
        self.mentions
    }

    /// True when nobody is mentioned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.mentions == 0
    }
}

impl fmt::Display for RewardMessage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.text)
    }
}
