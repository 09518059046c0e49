// Aero shell host channels
// The two independent, unordered links to the host process: request/response
// commands and pushed events. The shell only sees them through these traits.

pub mod json_lines;
pub mod loopback;

use tokio::sync::mpsc;

use crate::types::command::{Command, CommandReply};
use crate::types::errors::ChannelError;
use crate::types::event::HostEvent;

/// Request/response link to the host. One reply or one error per command.
#[allow(async_fn_in_trait)]
pub trait CommandChannel {
    async fn invoke(&self, command: Command) -> Result<CommandReply, ChannelError>;
}

/// Source of host notifications, delivered in host emission order.
/// `None` means the host will send nothing more.
#[allow(async_fn_in_trait)]
pub trait EventChannel {
    async fn next_event(&mut self) -> Option<HostEvent>;
}

impl EventChannel for mpsc::UnboundedReceiver<HostEvent> {
    async fn next_event(&mut self) -> Option<HostEvent> {
        self.recv().await
    }
}

impl EventChannel for mpsc::Receiver<HostEvent> {
    async fn next_event(&mut self) -> Option<HostEvent> {
        self.recv().await
    }
}

impl<C: CommandChannel + ?Sized> CommandChannel for &C {
    async fn invoke(&self, command: Command) -> Result<CommandReply, ChannelError> {
        (**self).invoke(command).await
    }
}
