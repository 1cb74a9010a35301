//! Collapsing bursts of calls into a single delayed call.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Delays calls to `func` until `delay` has passed without another call.
///
/// Each [`call`](Debouncer::call) aborts the pending invocation, if any, and
/// schedules a new one with the latest arguments. Only the arguments of the
/// last call in a burst ever reach `func`.
///
/// Dropping a `Debouncer` does not cancel an invocation that is already
/// scheduled.
pub struct Debouncer<F, A> {
    func: Arc<F>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    _args: PhantomData<fn(A)>,
}

impl<F, A> Debouncer<F, A>
where
    F: Fn(A) + Send + Sync + 'static,
    A: Send + 'static,
{
    pub fn new(func: F, delay: Duration) -> Self {
        Self {
            func: Arc::new(func),
            delay,
            pending: None,
            _args: PhantomData,
        }
    }

    /// Schedules `func(args)` to run after the delay, superseding any
    /// invocation scheduled by an earlier call.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn call(&mut self, args: A) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let func = Arc::clone(&self.func);
        let delay = self.delay;
        tracing::trace!(?delay, "scheduling debounced call");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            func(args);
        }));
    }
}

/// Wraps `func` in a [`Debouncer`] and returns it as a closure taking the
/// same arguments.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() {
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let mut search = client_utils::debounce(
///     move |term: &'static str| sink.lock().unwrap().push(term),
///     Duration::from_millis(300),
/// );
///
/// search("c");
/// search("ca");
/// search("cat");
/// tokio::time::sleep(Duration::from_millis(400)).await;
/// assert_eq!(*seen.lock().unwrap(), ["cat"]);
/// # }
/// ```
pub fn debounce<F, A>(func: F, delay: Duration) -> impl FnMut(A)
where
    F: Fn(A) + Send + Sync + 'static,
    A: Send + 'static,
{
    let mut debouncer = Debouncer::new(func, delay);
    move |args| debouncer.call(args)
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::{Debouncer, debounce};

    fn recorder<A: Send + 'static>() -> (Arc<Mutex<Vec<A>>>, impl Fn(A) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |args| sink.lock().unwrap().push(args))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_into_last_call() {
        let (calls, func) = recorder();
        let mut debounced = Debouncer::new(func, Duration::from_millis(100));

        debounced.call((1, "first"));
        debounced.call((2, "second"));
        debounced.call((3, "third"));
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(*calls.lock().unwrap(), [(3, "third")]);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_the_delay() {
        let (calls, func) = recorder::<u8>();
        let mut debounced = debounce(func, Duration::from_millis(100));

        debounced(1);
        tokio::time::sleep(Duration::from_millis(60)).await;
        debounced(2);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(calls.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(*calls.lock().unwrap(), [2]);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_fire_separately() {
        let (calls, func) = recorder::<&str>();
        let mut debounced = debounce(func, Duration::from_millis(100));

        debounced("a");
        tokio::time::sleep(Duration::from_millis(150)).await;
        debounced("b");
        debounced("c");
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(*calls.lock().unwrap(), ["a", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn instances_do_not_share_timers() {
        let (calls, func) = recorder::<&str>();
        let func = Arc::new(func);
        let other = Arc::clone(&func);
        let mut left = debounce(move |s: &'static str| func(s), Duration::from_millis(100));
        let mut right = debounce(move |s: &'static str| other(s), Duration::from_millis(100));

        left("left");
        right("right");
        tokio::time::sleep(Duration::from_millis(150)).await;

        let mut seen = calls.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, ["left", "right"]);
    }
}
