use std::fmt::Display;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure of a single strategy inside a fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    pub strategy: String,
    pub error: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", self.describe())]
pub struct FallbackError {
    pub failures: Vec<AttemptFailure>,
}

impl FallbackError {
    fn describe(&self) -> String {
        if self.failures.is_empty() {
            return "no strategies to attempt".to_string();
        }

        self.failures
            .iter()
            .enumerate()
            .map(|(i, failure)| format!("{}. {}: {}", i + 1, failure.strategy, failure.error))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Runs `attempt` for each strategy in order and returns the first success. Later strategies
/// are not attempted once one succeeds. When every strategy fails, all failures are returned
/// in the order they happened.
pub async fn first_success<S, T, E, F, Fut>(strategies: impl IntoIterator<Item = S>, mut attempt: F) -> Result<T, FallbackError>
where
    S: Display + Copy,
    E: Display,
    F: FnMut(S) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut failures = Vec::new();

    for strategy in strategies {
        debug!("🔁 Attempting {}...", strategy);
        match attempt(strategy).await {
            Ok(value) => {
                debug!("🔁 Attempting {}... OK", strategy);
                return Ok(value);
            }
            Err(error) => {
                warn!("⚠️ Attempting {}... failed, {}", strategy, error);
                failures.push(AttemptFailure {
                    strategy: strategy.to_string(),
                    error: error.to_string(),
                });
            }
        }
    }

    Err(FallbackError { failures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use test_log::test;

    #[test(tokio::test)]
    async fn stops_at_the_first_success() {
        let attempted = Mutex::new(Vec::new());

        let result = first_success(["first", "second", "third"], |strategy| {
            attempted.lock().unwrap().push(strategy);
            async move { if strategy == "second" { Ok(42) } else { Err("nope") } }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(*attempted.lock().unwrap(), vec!["first", "second"]);
    }

    #[test(tokio::test)]
    async fn aggregates_every_failure_in_order() {
        let result: Result<(), _> = first_success(["first", "second", "third"], |strategy| async move { Err(format!("{} is down", strategy)) }).await;

        let error = result.unwrap_err();
        assert_eq!(error.failures.len(), 3);
        assert_eq!(
            error.to_string(),
            "1. first: first is down; 2. second: second is down; 3. third: third is down"
        );
    }

    #[test(tokio::test)]
    async fn fails_without_strategies() {
        let result: Result<(), FallbackError> = first_success(Vec::<&str>::new(), |_| async { Ok::<(), String>(()) }).await;

        assert_eq!(result.unwrap_err().to_string(), "no strategies to attempt");
    }
}
