//! One-way hand-off of invocation messages to the host transport.

use crate::error::BridgeError;
use crate::js_message::InvocationMessage;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// The send capability: takes ownership of a message and queues it for
/// delivery without waiting for a reply.
pub trait MessageSender {
    fn send(&self, message: InvocationMessage) -> Result<(), BridgeError>;
}

impl<F> MessageSender for F
where
    F: Fn(InvocationMessage) -> Result<(), BridgeError>,
{
    fn send(&self, message: InvocationMessage) -> Result<(), BridgeError> {
        self(message)
    }
}

/// Sender half of an unbounded in-process channel.
#[derive(Clone, Debug)]
pub struct ChannelSender {
    tx: Sender<InvocationMessage>,
}

impl ChannelSender {
    pub fn new(tx: Sender<InvocationMessage>) -> Self {
        ChannelSender { tx }
    }
}

impl MessageSender for ChannelSender {
    fn send(&self, message: InvocationMessage) -> Result<(), BridgeError> {
        self.tx.send(message).map_err(|e| BridgeError::Transport {
            message: format!("failed to queue message '{}': receiver disconnected", e.0.method_name),
        })
    }
}

/// Create a connected (sender, receiver) pair. Sends never block.
pub fn channel() -> (ChannelSender, Receiver<InvocationMessage>) {
    let (tx, rx) = unbounded::<InvocationMessage>();
    (ChannelSender::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use std::thread;

    fn message(name: &str) -> InvocationMessage {
        InvocationMessage {
            method_name: name.to_string(),
            arguments: vec![Value::Bool(true)],
        }
    }

    #[test]
    fn test_channel_delivers_in_order() {
        let (sender, rx) = channel();
        sender.send(message("a")).unwrap();
        sender.send(message("b")).unwrap();
        assert_eq!(rx.recv().unwrap().method_name, "a");
        assert_eq!(rx.recv().unwrap().method_name, "b");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disconnected_receiver() {
        let (sender, rx) = channel();
        drop(rx);
        let err = sender.send(message("lost")).unwrap_err();
        assert!(matches!(err, BridgeError::Transport { .. }));
        assert!(err.to_string().contains("lost"));
    }

    #[test]
    fn test_senders_shared_across_threads() {
        let (sender, rx) = channel();
        let workers: Vec<_> = (0..4)
            .map(|i| {
                let sender = sender.clone();
                thread::spawn(move || sender.send(message(&format!("t{i}"))).unwrap())
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        drop(sender);
        assert_eq!(rx.iter().count(), 4);
    }
}
