use crate::{
    bootstrap::{LoadFailure, bootstrap},
    command::{Command, HELP},
    controller::Controller,
    transport::Transport,
    update::{UpdateFailure, persist},
    view::View,
};
use monoio::task::JoinHandle;
use pixelwall_common::UpdateRequest;
use std::{
    io::{self, BufRead},
    sync::mpsc::{self, TryRecvError},
    thread,
    time::Duration,
};

const TICK: Duration = Duration::from_millis(20);

pub enum Step {
    Continue,
    /// A persistence request is now in flight. Dropping the handle detaches it.
    Dispatched(JoinHandle<Result<(), UpdateFailure>>),
    Quit,
}

pub struct Session<T, V> {
    transport: T,
    controller: Controller<V>,
}

impl<T, V> Session<T, V>
where
    T: Transport + Clone + 'static,
    V: View,
{
    pub fn new(transport: T, controller: Controller<V>) -> Self {
        Self {
            transport,
            controller,
        }
    }

    pub async fn start(&mut self) -> Result<(), LoadFailure> {
        bootstrap(&self.transport, &mut self.controller).await
    }

    pub fn handle(&mut self, command: Command) -> Step {
        match command {
            Command::Click(id) => {
                self.controller.click(id);
            }
            Command::ClickAt { row, col } => match self.controller.grid().id_at(row, col) {
                Some(id) => {
                    self.controller.click(id);
                }
                None => warn!(row, col, "no such cell"),
            },
            Command::Color(color) => match self.controller.choose(color) {
                Some(request) => return Step::Dispatched(self.dispatch(request)),
                None => debug!("no pixel is waiting for a color"),
            },
            Command::Cancel => self.controller.dismiss(),
            Command::Show => self.controller.refresh(),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Step::Quit,
        }

        Step::Continue
    }

    fn dispatch(&self, request: UpdateRequest) -> JoinHandle<Result<(), UpdateFailure>> {
        let transport = self.transport.clone();
        monoio::spawn(async move { persist(&transport, request).await })
    }

    /// Feed input lines to the controller until `quit` or end of input.
    ///
    /// Updates still in flight when this returns are abandoned.
    pub async fn run(&mut self, lines: mpsc::Receiver<String>) {
        loop {
            let line = match lines.try_recv() {
                Ok(line) => line,
                Err(TryRecvError::Empty) => {
                    monoio::time::sleep(TICK).await;
                    continue;
                }
                Err(TryRecvError::Disconnected) => break,
            };

            let picking = self.controller.selection().pending().is_some();
            match Command::parse(&line, picking) {
                Ok(Some(command)) => {
                    if let Step::Quit = self.handle(command) {
                        break;
                    }
                }
                Ok(None) => {}
                Err(error) => warn!(%error, "ignoring input"),
            }
        }
    }

    #[cfg(test)]
    pub fn controller(&self) -> &Controller<V> {
        &self.controller
    }
}

pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };

            if sender.send(line).is_err() {
                break;
            }
        }
    });

    receiver
}
