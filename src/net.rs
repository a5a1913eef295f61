//! Small helpers for rate-limit friendly networking.

use rand::{thread_rng, Rng};

/// Send a request, retrying 429s and transport errors with exponential
/// backoff plus jitter. `label` identifies the call site in logs.
pub async fn send_with_backoff(
    rb: reqwest::RequestBuilder,
    label: &str,
    max_retries: u8,
) -> Result<reqwest::Response, reqwest::Error> {
    let mut attempt = 0u8;
    loop {
        let res = rb.try_clone().expect("cloneable request").send().await;
        match res {
            Ok(r) => {
                if r.status().as_u16() == 429 && attempt < max_retries {
                    attempt += 1;
                    let back_ms = backoff_delay_ms(attempt);
                    log::warn!("[tubex][net] 429 {label} retry={attempt} backoff={back_ms}ms");
                    tokio::time::sleep(std::time::Duration::from_millis(back_ms)).await;
                    continue;
                }
                return Ok(r);
            }
            Err(e) => {
                if attempt < max_retries {
                    attempt += 1;
                    let back_ms = backoff_delay_ms(attempt);
                    log::warn!("[tubex][net] err {label} retry={attempt} backoff={back_ms}ms : {e}");
                    tokio::time::sleep(std::time::Duration::from_millis(back_ms)).await;
                    continue;
                }
                return Err(e);
            }
        }
    }
}

fn backoff_delay_ms(attempt: u8) -> u64 {
    let base = 300u64.saturating_mul(1u64 << (attempt.min(5) - 1)); // 300,600,1200,2400,4800,9600
    let jitter: u64 = thread_rng().gen_range(0..=250);
    base + jitter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_then_caps() {
        for attempt in 1..=8u8 {
            let d = backoff_delay_ms(attempt);
            let base = 300u64 * (1u64 << (attempt.min(5) - 1));
            assert!(d >= base && d <= base + 250, "attempt {attempt}: {d}");
        }
    }
}
