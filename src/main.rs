/*
 * Lane: payment links for invoices from the terminal
 *
 * lane <amount> --desc <text>
 * - parse the amount into cents
 * - pick a provider: the Lane backend when logged in, Stripe when
 *   STRIPE_KEY is set
 * - create the payment link, copy it, print it
 *
 * lane login
 * - ask the backend for a one-time code
 * - open the browser on the code's login page
 * - poll the backend with the code until a token shows up
 * - store the token under ~/.lane
 *
 * lane logout
 * - remove the stored token
 */

mod api;
mod auth;
mod billing;
mod browser;
mod cli;
mod clipboard;
mod config;
mod error;
mod input;
mod invoices;
mod logging;
mod login;
mod poller;
mod run;
mod stripe;
mod token_store;
mod ui;
mod wire;

use std::process::ExitCode;

use clap::Parser;
use crate::cli::Opts;

fn main() -> ExitCode {
    let opts = Opts::parse();
    logging::register_logger(opts.verbose);

    match run::run_cmd(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", ui::error(&error.to_string()));
            ExitCode::FAILURE
        }
    }
}
