//! Debounced value channel.
//!
//! The input half absorbs a rapidly-changing value (keystrokes, in the
//! original UI); the output half yields a value only once the input has been
//! quiet for the configured delay. Last write wins: each send overwrites the
//! pending slot and restarts the single timer, so intermediate values are
//! never observed. Dropping the output half cancels everything by
//! construction - nothing is spawned.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

struct Slot<T> {
    value: Option<T>,
    deadline: Option<Instant>,
    closed: bool,
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
    notify: Notify,
}

pub struct DebounceInput<T> {
    shared: Arc<Shared<T>>,
    delay: Duration,
}

pub struct DebouncedOutput<T> {
    shared: Arc<Shared<T>>,
}

pub fn channel<T>(delay: Duration) -> (DebounceInput<T>, DebouncedOutput<T>) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(Slot {
            value: None,
            deadline: None,
            closed: false,
        }),
        notify: Notify::new(),
    });
    (
        DebounceInput {
            shared: shared.clone(),
            delay,
        },
        DebouncedOutput { shared },
    )
}

impl<T> DebounceInput<T> {
    /// Overwrite the pending value and restart the settle timer.
    pub fn send(&self, value: T) {
        let mut slot = self.shared.slot.lock().expect("debounce slot poisoned");
        slot.value = Some(value);
        slot.deadline = Some(Instant::now() + self.delay);
        drop(slot);
        self.shared.notify.notify_one();
    }

    /// Drop whatever is pending without delivering it.
    pub fn clear(&self) {
        let mut slot = self.shared.slot.lock().expect("debounce slot poisoned");
        slot.value = None;
        slot.deadline = None;
    }
}

impl<T> Drop for DebounceInput<T> {
    fn drop(&mut self) {
        let mut slot = self.shared.slot.lock().expect("debounce slot poisoned");
        slot.closed = true;
        drop(slot);
        self.shared.notify.notify_one();
    }
}

impl<T> DebouncedOutput<T> {
    /// Wait for the next settled value. A value still pending when the input
    /// half is dropped is flushed after its delay; after that, `None`.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            let wait = {
                let mut slot = self.shared.slot.lock().expect("debounce slot poisoned");
                match slot.deadline {
                    Some(deadline) => {
                        if Instant::now() >= deadline {
                            slot.deadline = None;
                            return slot.value.take();
                        }
                        Some(deadline)
                    }
                    None => {
                        if slot.closed {
                            return None;
                        }
                        None
                    }
                }
            };

            match wait {
                // A newer send may push the deadline while we sleep; the
                // loop re-reads it and sleeps again.
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => self.shared.notify.notified().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_value_of_a_burst_settles() {
        let (input, mut output) = channel::<String>(Duration::from_millis(300));

        input.send("h".to_string());
        tokio::time::advance(Duration::from_millis(100)).await;
        input.send("ha".to_string());
        tokio::time::advance(Duration::from_millis(100)).await;
        input.send("harry".to_string());

        // Quiet period elapses only after the final keystroke.
        assert_eq!(
            output.recv().await.as_deref(),
            Some("harry"),
            "debounced value should be the last one sent"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn value_is_not_released_before_the_delay() {
        let (input, mut output) = channel::<u32>(Duration::from_millis(300));
        input.send(1);

        let premature = tokio::time::timeout(Duration::from_millis(200), output.recv()).await;
        assert!(premature.is_err(), "value released before the delay elapsed");

        assert_eq!(output.recv().await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn each_send_restarts_the_timer() {
        let (input, mut output) = channel::<u32>(Duration::from_millis(300));

        input.send(1);
        tokio::time::advance(Duration::from_millis(250)).await;
        input.send(2);

        // 250ms after the second send the first timer would have fired.
        let premature = tokio::time::timeout(Duration::from_millis(250), output.recv()).await;
        assert!(premature.is_err());

        assert_eq!(output.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cancels_the_pending_value() {
        let (input, mut output) = channel::<u32>(Duration::from_millis(300));
        input.send(1);
        input.clear();

        let nothing = tokio::time::timeout(Duration::from_millis(500), output.recv()).await;
        assert!(nothing.is_err(), "cleared value must not be delivered");
    }

    #[tokio::test(start_paused = true)]
    async fn closing_without_a_pending_value_yields_none() {
        let (input, mut output) = channel::<u32>(Duration::from_millis(300));
        drop(input);
        assert_eq!(output.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_value_is_flushed_on_close_then_none() {
        let (input, mut output) = channel::<u32>(Duration::from_millis(300));
        input.send(7);
        drop(input);
        assert_eq!(output.recv().await, Some(7));
        assert_eq!(output.recv().await, None);
    }
}
