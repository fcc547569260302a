use model::{ChatMessage, Role};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{ComputeError, Result};
use crate::simulation::PendingTask;

pub const GREETING: &str = "Hello! I'm ProAsk, your AI forecasting assistant. I can help you understand your forecasts, analyze sales trends, and compare different sales groups. What would you like to know?";

/// Offered while the conversation only holds the greeting.
pub const SUGGESTED_PROMPTS: [&str; 4] = [
    "Explain last forecast",
    "Why did sales spike?",
    "Compare sales groups",
    "Show accuracy trends",
];

const LAST_FORECAST_REPLY: &str = "The last forecast was generated for Electronics × North America with a 3-month horizon. The model predicted a 12.8% growth rate with 94.2% accuracy. The forecast used our Hybrid SARIMAX + ML model, which combines statistical baseline predictions with machine learning adjustments. The peak is expected in December at 33,700 units, driven by seasonal holiday demand patterns.";

const SALES_SPIKE_REPLY: &str = "The sales spike in September-November is primarily driven by three factors: 1) Back-to-school and holiday shopping season preparation, 2) New product launches in the electronics category, and 3) Promotional campaigns that increased conversion rates by 18%. This pattern is consistent with historical data from the past 3 years.";

const COMPARE_REPLY: &str = "Comparing your top 3 sales groups:\n\n• Electronics × North America: 12.8% growth, highest volume (23K units/month)\n• Apparel × EMEA: 8.4% growth, strong stability\n• Beauty × North America: 15.2% growth, highest growth rate but smaller volume\n\nElectronics leads in absolute numbers, while Beauty shows the strongest growth trajectory. Would you like a detailed breakdown of any specific group?";

const ACCURACY_REPLY: &str = "Your forecast accuracy has been improving consistently:\n\n• Last 3 months: 94.2% average accuracy\n• Previous quarter: 91.8%\n• Improvement: +2.4%\n\nThe Hybrid SARIMAX + ML model is performing particularly well on sales groups with at least 18 months of historical data. Electronics and Beauty groups show the highest accuracy (>95%), while newer groups like Home Goods are stabilizing at 89%.";

const FALLBACK_REPLY: &str = "I can help you with various analyses including forecast explanations, trend analysis, sales group comparisons, and accuracy metrics. Could you please provide more details about what you'd like to know? You can also try one of the suggested prompts above.";

/// Picks the canned answer for a prompt. The first matching rule wins.
pub fn canned_reply(prompt: &str) -> &'static str {
    let prompt = prompt.to_lowercase();
    let rules: [(&[&str], &'static str); 4] = [
        (&["last forecast", "explain"], LAST_FORECAST_REPLY),
        (&["spike", "sales"], SALES_SPIKE_REPLY),
        (&["compare"], COMPARE_REPLY),
        (&["accuracy"], ACCURACY_REPLY),
    ];

    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| prompt.contains(k)))
        .map(|(_, reply)| *reply)
        .unwrap_or(FALLBACK_REPLY)
}

/// The "ProAsk" chat assistant.
///
/// Every sent message queues one delayed reply; replies are delivered in
/// the order the messages were sent.
#[derive(Debug)]
pub struct Assistant {
    messages: Vec<ChatMessage>,
    next_id: u64,
    delay: Duration,
    pending: VecDeque<PendingTask<ChatMessage>>,
}

impl Assistant {
    pub fn new(delay: Duration) -> Self {
        Self {
            messages: vec![ChatMessage::new(0, Role::Assistant, GREETING)],
            next_id: 1,
            delay,
            pending: VecDeque::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn suggested_prompts(&self) -> &'static [&'static str] {
        if self.messages.len() == 1 {
            &SUGGESTED_PROMPTS
        } else {
            &[]
        }
    }

    /// Whether a reply is still on its way.
    pub fn is_typing(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Appends the user's message and schedules the reply.
    ///
    /// Whitespace-only input is ignored and returns `false`.
    pub fn send(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            debug!("Ignoring blank assistant prompt");
            return false;
        }

        let user_id = self.take_id();
        self.messages
            .push(ChatMessage::new(user_id, Role::User, text));

        let reply_id = self.take_id();
        let reply = canned_reply(text);
        info!(reply_id, "Assistant reply scheduled");
        self.pending.push_back(PendingTask::schedule(
            "Assistant reply",
            self.delay,
            move || ChatMessage::new(reply_id, Role::Assistant, reply),
        ));
        true
    }

    /// Waits for the oldest pending reply and appends it.
    pub async fn finish_reply(&mut self) -> Result<&ChatMessage> {
        let task = self.pending.pop_front().ok_or_else(|| {
            ComputeError::Validation("No assistant reply is pending".to_string())
        })?;
        let reply = task.wait().await?;
        self.messages.push(reply);
        self.messages
            .last()
            .ok_or_else(|| ComputeError::Runtime("Conversation is empty".to_string()))
    }

    /// Drops every reply still on its way.
    pub fn cancel_pending(&mut self) {
        if !self.pending.is_empty() {
            debug!(count = self.pending.len(), "Cancelling assistant replies");
        }
        for task in self.pending.drain(..) {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_routing_order() {
        assert_eq!(canned_reply("Explain last forecast"), LAST_FORECAST_REPLY);
        // "explain" wins over "sales"
        assert_eq!(canned_reply("explain the sales"), LAST_FORECAST_REPLY);
        assert_eq!(canned_reply("Why did sales SPIKE?"), SALES_SPIKE_REPLY);
        // "sales" wins over "compare"
        assert_eq!(canned_reply("Compare sales groups"), SALES_SPIKE_REPLY);
        assert_eq!(canned_reply("compare groups"), COMPARE_REPLY);
        assert_eq!(canned_reply("Show accuracy trends"), ACCURACY_REPLY);
        assert_eq!(canned_reply("hello"), FALLBACK_REPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_conversation_flow() {
        let mut assistant = Assistant::new(Duration::from_millis(1500));
        assert_eq!(assistant.messages().len(), 1);
        assert_eq!(assistant.messages()[0].content, GREETING);
        assert_eq!(assistant.suggested_prompts().len(), 4);

        assert!(!assistant.send("   "));
        assert_eq!(assistant.messages().len(), 1);

        assert!(assistant.send("Show accuracy trends"));
        assert!(assistant.is_typing());
        assert!(assistant.suggested_prompts().is_empty());

        let reply = assistant.finish_reply().await.unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, ACCURACY_REPLY);
        assert_eq!(reply.id, 2);
        assert!(!assistant.is_typing());
        assert_eq!(assistant.messages().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replies_arrive_in_order() {
        let mut assistant = Assistant::new(Duration::from_millis(1500));
        assistant.send("compare");
        assistant.send("hi");
        assert_eq!(assistant.pending_replies(), 2);

        assert_eq!(assistant.finish_reply().await.unwrap().content, COMPARE_REPLY);
        assert_eq!(assistant.finish_reply().await.unwrap().content, FALLBACK_REPLY);
        assert!(assistant.finish_reply().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_replies() {
        let mut assistant = Assistant::new(Duration::from_millis(1500));
        assistant.send("explain");
        assistant.cancel_pending();

        assert!(!assistant.is_typing());
        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(assistant.messages().len(), 2);
    }
}
