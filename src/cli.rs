use clap::{Parser, Subcommand};

/* Argument Structure
 *
 * <amount> [--client <name>] [--email <email>] [--desc <text>]
 *          [--currency <code>] [--send] [--no-copy]
 * login
 * logout
 * whoami
 */

/// Generate payment links for invoices straight from the terminal
#[derive(Parser)]
#[clap(
    name = "lane",
    version,
    args_conflicts_with_subcommands = true,
    after_help = "Examples:\n  \
        lane 100 --client \"Acme Corp\" --desc \"Consulting\"\n  \
        lane 2500 --client \"Startup Inc\" --desc \"Logo Design\" --currency eur\n  \
        lane 50.99 --desc \"Quick fix\""
)]
pub struct Opts {
    /// Show debug logging on stderr
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(flatten)]
    pub invoice: InvoiceArgs,

    #[clap(subcommand)]
    pub subcommand: Option<Command>,
}

#[derive(clap::Args)]
pub struct InvoiceArgs {
    /// Amount to bill, in dollars (e.g. 500, 50.99, $20)
    #[clap(allow_negative_numbers = true)]
    pub amount: Option<String>,

    /// Client name
    #[clap(short, long)]
    pub client: Option<String>,

    /// Client email, used when sending the invoice
    #[clap(short, long)]
    pub email: Option<String>,

    /// Invoice description, prompted for when omitted
    #[clap(short, long = "desc")]
    pub description: Option<String>,

    /// Currency code (usd, eur, gbp, cad, aud, chf)
    #[clap(long, default_value = "usd")]
    pub currency: String,

    /// Email the invoice to the client
    #[clap(long)]
    pub send: bool,

    /// Don't copy the payment link to the clipboard
    #[clap(long)]
    pub no_copy: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in to your Lane account through the browser
    Login,

    /// Remove the stored authentication token
    Logout,

    /// Show the account the stored token belongs to
    Whoami,
}
