//! Simulated streaming of a finished reply.
//!
//! The provider returns complete text. Delivery re-chunks it into groups of
//! words and yields them as a timed stream of [`DeliveryEvent`]s ending in
//! exactly one terminal event. Dropping the stream cancels any pending
//! pause, so a disconnected consumer simply stops receiving.

use std::time::Duration;

use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use gemrelay_config::DeliveryConfig;

/// Sent in place of an empty or whitespace-only reply.
pub const FALLBACK_REPLY: &str = "Sorry, I don't have an answer for that.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryEvent {
    Partial { text: String },
    Done,
    Error { message: String },
}

impl DeliveryEvent {
    pub fn partial(text: impl Into<String>) -> Self {
        Self::Partial { text: text.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// `Done` and `Error` end a delivery.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Partial { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOptions {
    pub chunk_word_count: usize,
    pub inter_chunk_delay: Duration,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            chunk_word_count: 3,
            inter_chunk_delay: Duration::from_millis(50),
        }
    }
}

impl From<&DeliveryConfig> for DeliveryOptions {
    fn from(config: &DeliveryConfig) -> Self {
        Self {
            chunk_word_count: config.chunk_word_count.max(1) as usize,
            inter_chunk_delay: Duration::from_millis(u64::from(config.inter_chunk_delay_ms)),
        }
    }
}

/// Texts of the partial events `deliver` emits for `text`.
///
/// Words are separated by any whitespace and rejoined with single spaces,
/// each group followed by one trailing space.
pub fn plan_chunks(text: &str, chunk_word_count: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![FALLBACK_REPLY.to_string()];
    }

    words
        .chunks(chunk_word_count.max(1))
        .map(|group| format!("{} ", group.join(" ")))
        .collect()
}

/// Stream `text` as partial events followed by `Done`.
///
/// The first partial is immediate; `inter_chunk_delay` separates
/// consecutive partials.
pub fn deliver(text: &str, options: &DeliveryOptions) -> BoxStream<'static, DeliveryEvent> {
    let delay = options.inter_chunk_delay;
    let chunks = plan_chunks(text, options.chunk_word_count);

    stream::iter(chunks.into_iter().enumerate())
        .then(move |(index, text)| async move {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            DeliveryEvent::Partial { text }
        })
        .chain(stream::once(async { DeliveryEvent::Done }))
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn collect_words(chunks: &[String]) -> Vec<String> {
        chunks
            .iter()
            .flat_map(|c| c.split_whitespace().map(str::to_string))
            .collect()
    }

    #[test]
    fn plan_groups_words_with_trailing_space() {
        let chunks = plan_chunks("GDP is the total value of goods", 3);
        assert_eq!(chunks, vec!["GDP is the ", "total value of ", "goods "]);
    }

    #[test]
    fn plan_count_is_ceiling_of_words_over_chunk_size() {
        let text = "one two three four five six seven eight nine ten";
        for size in 1..=12 {
            let expected = 10_usize.div_ceil(size);
            assert_eq!(plan_chunks(text, size).len(), expected, "size {size}");
        }
    }

    #[test]
    fn plan_preserves_word_order_across_whitespace() {
        let text = "  first\tsecond\n\nthird   fourth fifth ";
        let chunks = plan_chunks(text, 2);
        assert_eq!(
            collect_words(&chunks),
            vec!["first", "second", "third", "fourth", "fifth"]
        );
        assert_eq!(chunks[0], "first second ");
    }

    #[test]
    fn plan_uses_fallback_for_blank_text() {
        assert_eq!(plan_chunks("", 3), vec![FALLBACK_REPLY.to_string()]);
        assert_eq!(plan_chunks(" \n\t ", 3), vec![FALLBACK_REPLY.to_string()]);
    }

    #[test]
    fn zero_chunk_size_is_treated_as_one() {
        assert_eq!(plan_chunks("a b", 0), vec!["a ", "b "]);
    }

    #[tokio::test(start_paused = true)]
    async fn deliver_emits_partials_then_one_done() {
        let events: Vec<_> = deliver("a b c d e f g", &DeliveryOptions::default())
            .collect()
            .await;

        assert_eq!(
            events,
            vec![
                DeliveryEvent::partial("a b c "),
                DeliveryEvent::partial("d e f "),
                DeliveryEvent::partial("g "),
                DeliveryEvent::Done,
            ]
        );
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn deliver_blank_text_emits_fallback_then_done() {
        let events: Vec<_> = deliver("   ", &DeliveryOptions::default()).collect().await;
        assert_eq!(
            events,
            vec![DeliveryEvent::partial(FALLBACK_REPLY), DeliveryEvent::Done]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn deliver_spaces_partials_by_delay() {
        let options = DeliveryOptions {
            chunk_word_count: 1,
            inter_chunk_delay: Duration::from_millis(50),
        };
        let start = Instant::now();
        let mut events = deliver("x y z", &options);

        let mut stamps = Vec::new();
        while let Some(event) = events.next().await {
            stamps.push((event, start.elapsed()));
        }

        assert_eq!(stamps[0].1, Duration::ZERO);
        assert_eq!(stamps[1].1, Duration::from_millis(50));
        assert_eq!(stamps[2].1, Duration::from_millis(100));
        assert_eq!(stamps[3], (DeliveryEvent::Done, Duration::from_millis(100)));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_stream_stops_delivery() {
        let mut events = deliver("a b c d e f", &DeliveryOptions::default());
        assert_eq!(events.next().await, Some(DeliveryEvent::partial("a b c ")));
        drop(events);

        // Nothing left scheduled: advancing time must not panic or emit.
        tokio::time::advance(Duration::from_secs(1)).await;
    }

    #[test]
    fn options_from_config() {
        let options = DeliveryOptions::from(&DeliveryConfig {
            chunk_word_count: 5,
            inter_chunk_delay_ms: 20,
        });
        assert_eq!(options.chunk_word_count, 5);
        assert_eq!(options.inter_chunk_delay, Duration::from_millis(20));
    }
}
