use std::time::Duration;

use futures::future::{self, Either};
use futures::stream::{self, Stream, StreamExt};

use crate::confirm::Sleep;

/// Emits the latest item once `input` has been quiet for `window`.
///
/// Every new item restarts the one pending timer. When `input` ends with an
/// item still waiting, that item is emitted immediately. Dropping the returned
/// stream cancels the timer.
pub fn debounce<St, S>(input: St, window: Duration, sleep: S) -> impl Stream<Item = St::Item>
where
    St: Stream + Unpin,
    S: Sleep,
{
    stream::unfold(Some((input, sleep)), move |state| async move {
        let Some((mut input, sleep)) = state else {
            return None;
        };
        let Some(mut latest) = input.next().await else {
            return None;
        };
        loop {
            let timer = sleep.sleep(window);
            let newer = match future::select(input.next(), timer).await {
                Either::Left((Some(item), _)) => Some(item),
                Either::Left((None, _)) => return Some((latest, None)),
                Either::Right(_) => None,
            };
            match newer {
                Some(item) => latest = item,
                None => return Some((latest, Some((input, sleep)))),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use futures::channel::mpsc;
    use tokio::time::Instant;

    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    fn tokio_sleep() -> impl Sleep {
        |duration: Duration| tokio::time::sleep(duration)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_emits_once_after_window() {
        let (tx, rx) = mpsc::unbounded();
        let mut debounced = Box::pin(debounce(rx, WINDOW, tokio_sleep()));

        let start = Instant::now();
        for query in ["l", "lo", "lot", "lott"] {
            tx.unbounded_send(query).unwrap();
        }

        assert_eq!(debounced.next().await, Some("lott"));
        let elapsed = start.elapsed();
        assert!(elapsed >= WINDOW && elapsed < WINDOW + Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_input_restarts_timer() {
        let (tx, rx) = mpsc::unbounded();
        let mut debounced = Box::pin(debounce(rx, WINDOW, tokio_sleep()));

        let typing = tokio::spawn(async move {
            for (delay, query) in [(0, "a"), (200, "ab"), (200, "abc"), (1000, "abcd")] {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                tx.unbounded_send(query).unwrap();
            }
        });

        let start = Instant::now();
        assert_eq!(debounced.next().await, Some("abc"));
        let first = start.elapsed();
        assert!(first >= Duration::from_millis(900) && first < Duration::from_millis(950));

        // sender is dropped after the last item, so the tail flushes at once
        assert_eq!(debounced.next().await, Some("abcd"));
        assert_eq!(debounced.next().await, None);
        typing.await.unwrap();
    }

    #[tokio::test]
    async fn closed_input_flushes_pending_item() {
        let debounced = debounce(stream::iter(["x", "y"]), WINDOW, tokio_sleep());
        let items: Vec<_> = debounced.collect().await;
        assert_eq!(items, ["y"]);
    }
}
