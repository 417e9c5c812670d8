use crate::api::LaneClient;
use crate::auth::HttpAuthBackend;
use crate::billing::{Cents, Currency};
use crate::browser::SystemBrowser;
use crate::cli::{Command, InvoiceArgs, Opts};
use crate::clipboard;
use crate::config::{Config, PollSettings, INVOICE_REQUEST_TIMEOUT};
use crate::error::{
    AmountError, AuthError, ConfigError, InvoiceError, StoreError,
};
use crate::input;
use crate::invoices::{CreatedInvoice, InvoiceProvider, InvoiceRequest};
use crate::login::{self, LoginOutcome, LogoutOutcome};
use crate::stripe::{StripeClient, STRIPE_API_URL};
use crate::token_store::TokenStore;
use crate::ui;

use thiserror::Error;
use tracing::{debug, info};

pub fn run_cmd(opts: Opts) -> Result<(), RunError> {
    let config = Config::from_env()?;
    debug!(api_url = %config.api_url, "resolved configuration");

    match opts.subcommand {
        Some(Command::Login) => login(&config),
        Some(Command::Logout) => logout(&config),
        Some(Command::Whoami) => whoami(&config),
        None => invoice(&config, STRIPE_API_URL, opts.invoice),
    }
}

fn login(config: &Config) -> Result<(), RunError> {
    println!("\n{}\n", ui::header("⚡ Lane Login"));

    let store = TokenStore::from_config(config);
    let settings = PollSettings::default();
    let backend =
        HttpAuthBackend::new(&config.api_url, settings.request_timeout)?;
    info!(api_url = %config.api_url, "logging in");

    match login::login(&store, &backend, &SystemBrowser, &settings)? {
        LoginOutcome::AlreadyLoggedIn => println!(
            "{}",
            ui::subtle("Already logged in. Use 'lane logout' to switch accounts.")
        ),
        LoginOutcome::LoggedIn => {
            println!("{}\n", ui::success("Logged in successfully!"));
            println!("{}", ui::subtle("You can now create invoices with:"));
            println!(
                "{}\n",
                ui::label("  lane 100 --client \"Acme\" --desc \"Consulting\"")
            );
        }
    }
    Ok(())
}

fn logout(config: &Config) -> Result<(), RunError> {
    let store = TokenStore::from_config(config);

    match login::logout(&store)? {
        LogoutOutcome::NotLoggedIn => {
            println!("{}", ui::subtle("You're not logged in."))
        }
        LogoutOutcome::LoggedOut => println!("{}", ui::success("Logged out")),
    }

    if store.has_override() {
        println!(
            "{}",
            ui::subtle("LANE_TOKEN is still set and will keep authenticating this shell.")
        );
    }
    Ok(())
}

fn whoami(config: &Config) -> Result<(), RunError> {
    let token = TokenStore::from_config(config).resolve_token()?;
    let client =
        LaneClient::new(&config.api_url, token, INVOICE_REQUEST_TIMEOUT)?;
    let user = client.current_user()?;

    let name = if user.name.is_empty() { &user.id } else { &user.name };
    println!("{}", ui::field("Logged in as", name));
    if !user.email.is_empty() {
        println!("{}", ui::field("Email", &user.email));
    }
    Ok(())
}

/// The Lane backend when a token resolves, Stripe when only a secret key
/// is configured.
fn select_provider(
    config: &Config,
    stripe_url: &str,
) -> Result<Box<dyn InvoiceProvider>, RunError> {
    match TokenStore::from_config(config).resolve_token() {
        Ok(token) => Ok(Box::new(LaneClient::new(
            &config.api_url,
            token,
            INVOICE_REQUEST_TIMEOUT,
        )?)),
        Err(StoreError::NotLoggedIn) => match &config.stripe_key {
            Some(key) => Ok(Box::new(StripeClient::new(
                stripe_url,
                key.clone(),
                INVOICE_REQUEST_TIMEOUT,
            )?)),
            None => Err(StoreError::NotLoggedIn.into()),
        },
        Err(e) => Err(e.into()),
    }
}

fn invoice(
    config: &Config,
    stripe_url: &str,
    args: InvoiceArgs,
) -> Result<(), RunError> {
    let amount: Cents = args
        .amount
        .as_deref()
        .ok_or(RunError::MissingAmount)?
        .parse()?;
    let currency = Currency::parse(&args.currency)?;

    println!("\n{}", ui::header("⚡ Lane"));

    let description = match args.description.filter(|d| !d.trim().is_empty()) {
        Some(description) => description,
        None => input::description()?,
    };

    let provider = select_provider(config, stripe_url)?;
    println!("{}", ui::step(&format!("Connecting to {}...", provider.name())));

    let mut send = args.send;
    if send && !provider.supports_email() {
        println!(
            "{}",
            ui::subtle("Sending email requires 'lane login'; skipping email.")
        );
        send = false;
    }
    let email = match args.email {
        None if send => Some(input::client_email()?),
        email => email,
    };

    let request = InvoiceRequest {
        amount,
        currency,
        client: args.client.filter(|c| !c.trim().is_empty()),
        email,
        description,
        send,
    };

    println!("{}", ui::step("Creating invoice..."));
    let created = provider.create_invoice(&request)?;
    info!(%created, "invoice created");

    let copied = if args.no_copy {
        None
    } else {
        Some(clipboard::copy(&created.payment_link))
    };
    println!("{}\n", ui::result_box(&summary(&request, &created, copied)));
    Ok(())
}

fn summary(
    request: &InvoiceRequest,
    created: &CreatedInvoice,
    copied: Option<Result<(), crate::error::LaunchError>>,
) -> String {
    let mut lines = vec![ui::success("Invoice created successfully!"), String::new()];

    if let Some(client) = &request.client {
        lines.push(ui::field("Client", client));
    }
    lines.push(ui::field("Description", &request.description));
    lines.push(format!(
        "{}{}",
        ui::label("Amount: "),
        ui::highlight(&request.total().to_string())
    ));
    if let (true, Some(email)) = (created.email_sent, &request.email) {
        lines.push(ui::field("Sent to", email));
    }
    lines.push(String::new());

    let status = match copied {
        None => String::new(),
        Some(Ok(())) => ui::success("(copied!)"),
        Some(Err(e)) => {
            debug!("clipboard unavailable: {}", e);
            ui::subtle("(clipboard unavailable)")
        }
    };
    lines.push(format!("{}{}", ui::label("Payment Link: "), status));
    lines.push(ui::highlight(&created.payment_link));

    if let Some(pdf) = &created.pdf_url {
        lines.push(String::new());
        lines.push(ui::field("PDF", pdf));
    }
    lines.join("\n")
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("An amount is required, e.g. lane 100 --desc \"Consulting\"")]
    MissingAmount,

    #[error("{source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("{source}")]
    Amount {
        #[from]
        source: AmountError,
    },

    #[error("{source}")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("{source}")]
    Auth {
        #[from]
        source: AuthError,
    },

    #[error("{source}")]
    Invoice {
        #[from]
        source: InvoiceError,
    },

    #[error("Input Error: {source}")]
    Input {
        #[from]
        source: inquire::error::InquireError,
    },
}
