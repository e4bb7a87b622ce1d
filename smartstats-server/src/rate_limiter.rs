use std::time::{Duration, Instant};

/// Token bucket guarding the outbound analysis call. One token per scoresheet.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    tokens: u32,
    max_tokens: u32,
    refill_rate: Duration,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(max_tokens: u32, refill_rate: Duration) -> Self {
        Self {
            tokens: max_tokens, // Start with full bucket
            max_tokens,
            refill_rate,
            last_refill: Instant::now(),
        }
    }

    pub fn check_rate_limit(&mut self) -> bool {
        self.refill_tokens();

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill_tokens(&mut self) {
        let refill_millis = self.refill_rate.as_millis().max(1);
        let elapsed = self.last_refill.elapsed();
        let earned = elapsed.as_millis() / refill_millis;

        if earned > 0 {
            let earned = u32::try_from(earned).unwrap_or(u32::MAX);
            self.tokens = self.tokens.saturating_add(earned).min(self.max_tokens);
            // Keep the remainder so partial intervals are not lost
            self.last_refill += self.refill_rate * earned;
        }
    }

    pub fn get_remaining_tokens(&mut self) -> u32 {
        self.refill_tokens();
        self.tokens
    }
}
