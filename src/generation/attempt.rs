//! Bounded draw/validate loop shared by the spawners

use crate::core::types::Result;

/// Outcome of a bounded search for one valid candidate
#[derive(Clone, Debug, PartialEq)]
pub enum Attempt<T> {
    Found { value: T, attempts: u32 },
    Exhausted { attempts: u32 },
}

impl<T> Attempt<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            Attempt::Found { attempts, .. } | Attempt::Exhausted { attempts } => *attempts,
        }
    }
}

/// Call `try_once` until it yields a value or `max_attempts` calls have failed.
///
/// `Ok(None)` rejects the candidate and draws again; errors abort immediately.
pub fn bounded<T, F>(max_attempts: u32, mut try_once: F) -> Result<Attempt<T>>
where
    F: FnMut() -> Result<Option<T>>,
{
    for attempt in 1..=max_attempts {
        if let Some(value) = try_once()? {
            return Ok(Attempt::Found { value, attempts: attempt });
        }
    }
    Ok(Attempt::Exhausted { attempts: max_attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    #[test]
    fn test_found_after_rejections() {
        let mut calls = 0;
        let outcome = bounded(10, || {
            calls += 1;
            Ok((calls == 4).then_some(calls))
        })
        .unwrap();
        assert_eq!(outcome, Attempt::Found { value: 4, attempts: 4 });
    }

    #[test]
    fn test_exhausted_stops_at_ceiling() {
        let mut calls = 0;
        let outcome: Attempt<()> = bounded(100, || {
            calls += 1;
            Ok(None)
        })
        .unwrap();
        assert_eq!(outcome, Attempt::Exhausted { attempts: 100 });
        assert_eq!(calls, 100);
    }

    #[test]
    fn test_error_aborts() {
        let mut calls = 0;
        let result: Result<Attempt<()>> = bounded(100, || {
            calls += 1;
            Err(Error::Collaborator("factory offline".into()))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_zero_ceiling() {
        let outcome: Attempt<u8> = bounded(0, || Ok(Some(1))).unwrap();
        assert_eq!(outcome.attempts(), 0);
        assert!(matches!(outcome, Attempt::Exhausted { .. }));
    }
}
