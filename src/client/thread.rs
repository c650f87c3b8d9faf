//! Deferred client-thread execution
//!
//! Widget mutations must run on the host's client thread, not on the event
//! callback thread. The plugin side holds a [`ClientThread`] handle and
//! enqueues closures; the host side drains them FIFO between events. Tasks
//! are fire-and-forget and run at most once.

use tokio::sync::mpsc;

use crate::client::state::Client;

/// A deferred mutation of client state.
pub type ClientTask = Box<dyn FnOnce(&mut Client) + Send + 'static>;

/// Plugin-side handle for scheduling work onto the client thread.
#[derive(Clone)]
pub struct ClientThread {
    tx: mpsc::UnboundedSender<ClientTask>,
}

/// Host-side consumer end of the client-thread queue.
pub struct TaskQueue {
    rx: mpsc::UnboundedReceiver<ClientTask>,
}

/// Create a connected (scheduler, consumer) pair.
pub fn channel() -> (ClientThread, TaskQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ClientThread { tx }, TaskQueue { rx })
}

impl ClientThread {
    /// Schedule `task` to run on the client thread. Never blocks; if the
    /// host side is gone the task is dropped silently.
    pub fn invoke_later(&self, task: impl FnOnce(&mut Client) + Send + 'static) {
        let _ = self.tx.send(Box::new(task));
    }
}

impl TaskQueue {
    /// Run every queued task against the client, in FIFO order.
    /// Returns the number of tasks executed.
    pub fn drain(&mut self, client: &mut Client) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task(client);
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::widget::{ChildKind, CHATBOX};

    #[test]
    fn test_tasks_drain_fifo_last_wins() {
        let (thread, mut queue) = channel();
        let mut client = Client::new();
        let root = client.widgets_mut().insert_root(CHATBOX, 0);

        thread.invoke_later(move |c| c.widgets_mut().set_hidden(root, true));
        thread.invoke_later(move |c| c.widgets_mut().set_hidden(root, false));

        assert_eq!(queue.drain(&mut client), 2);
        assert!(!client.widgets().is_hidden(root));
    }

    #[test]
    fn test_drain_empty_queue_is_noop() {
        let (_thread, mut queue) = channel();
        let mut client = Client::new();
        assert_eq!(queue.drain(&mut client), 0);
    }

    #[test]
    fn test_tasks_see_state_left_by_earlier_tasks() {
        let (thread, mut queue) = channel();
        let mut client = Client::new();
        let root = client.widgets_mut().insert_root(CHATBOX, 0);
        let child = client.widgets_mut().add_child(root, ChildKind::Dynamic, 0);

        thread.invoke_later(move |c| c.widgets_mut().set_hidden(child, true));
        thread.invoke_later(move |c| {
            let hidden = c.widgets().is_hidden(child);
            c.widgets_mut().set_hidden(root, hidden);
        });

        queue.drain(&mut client);
        assert!(client.widgets().is_hidden(root));
    }
}
