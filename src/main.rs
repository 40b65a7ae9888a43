#[macro_use]
extern crate tracing;

use crate::{
    command::HELP,
    controller::Controller,
    http::HttpClient,
    session::{Session, stdin_lines},
    terminal::{Palette, TerminalView},
};
use pixelwall_common::{Color, GridShape};
use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

mod bootstrap;
mod command;
mod controller;
mod http;
mod render;
mod selection;
mod session;
mod terminal;
#[cfg(test)]
mod testing;
mod transport;
mod update;
mod view;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const WHERE_TO: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000);

#[derive(argh::FromArgs)]
/// Paint the shared pixel wall from your terminal
struct Args {
    #[argh(option, default = "WHERE_TO")]
    /// address of the pixel wall server
    server: SocketAddr,

    #[argh(option, default = "GridShape::DEFAULT_SIDE")]
    /// cells per side of the wall
    side: u32,

    #[argh(option, default = "Color::default()")]
    /// color of cells nobody has painted yet
    default_color: Color,

    #[argh(switch)]
    /// draw painted cells as `##` instead of using 24-bit colors
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let args: Args = argh::from_env();

    let grid = GridShape::new(args.side)?;
    let palette = if args.no_color {
        Palette::Plain
    } else {
        Palette::TrueColor
    };

    let view = TerminalView::new(io::stdout(), palette, &args.default_color);
    let controller = Controller::new(grid, args.default_color, view);
    let mut session = Session::new(HttpClient::new(args.server), controller);

    let mut runtime = monoio::RuntimeBuilder::<monoio::FusionDriver>::new()
        .enable_timer()
        .build()?;

    let server = args.server;
    runtime.block_on(async move {
        info!(%server, side = grid.side(), "connecting to the wall");

        // the failure is already on screen, the grid stays dead until the next start
        session.start().await?;

        println!("{HELP}");
        session.run(stdin_lines()).await;

        info!("bye");
        Ok::<_, anyhow::Error>(())
    })
}
