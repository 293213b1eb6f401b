//! Command line surface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use shared::Role;
use shared::models::CertificateTemplate;

/// Samiti membership console
#[derive(Parser, Debug)]
#[command(name = "samiti", version, about)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "SAMITI_API_URL")]
    pub api_url: Option<String>,

    /// Where the login session is kept between runs
    #[arg(long, global = true, env = "SAMITI_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, global = true, env = "SAMITI_LOG_DIR", default_value = ".samiti/logs")]
    pub log_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip the confirmation prompt for destructive actions
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in as an operator (--email) or a member (--member)
    Login(LoginArgs),
    /// Forget the saved session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Member administration
    #[command(subcommand)]
    Members(MembersCommand),
    /// Donations
    #[command(subcommand)]
    Donations(DonationsCommand),
    /// Receipts
    #[command(subcommand)]
    Receipts(ReceiptsCommand),
    /// Certificates
    #[command(subcommand)]
    Certificates(CertificatesCommand),
    /// Notices
    #[command(subcommand)]
    Notices(NoticesCommand),
    /// Dashboard operators
    #[command(subcommand)]
    Operators(OperatorsCommand),
    /// Contribution groups and their plans
    #[command(subcommand)]
    Plans(PlansCommand),
    /// Overview for the logged-in member
    Dashboard,
    /// Register a new member from a JSON form file
    Register {
        form: PathBuf,
        /// Wait for the registration fee payment to settle
        #[arg(long)]
        watch: bool,
    },
    /// Start a donation and optionally wait for the payment to settle
    Donate(DonateArgs),
    /// Payment status
    #[command(subcommand)]
    Payment(PaymentCommand),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Operator email
    #[arg(long, conflicts_with = "member", required_unless_present = "member")]
    pub email: Option<String>,

    /// Member email, mobile or registration number
    #[arg(long)]
    pub member: Option<String>,

    #[arg(long, env = "SAMITI_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum MembersCommand {
    List(ListArgs),
    /// Full member record
    Show { id: String },
    /// Print the logged-in member's own profile
    Me,
    Verify { id: String },
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
    Block {
        id: String,
        #[arg(long)]
        reason: String,
    },
    Unblock { id: String },
    Deactivate { id: String },
    Reactivate { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum DonationsCommand {
    List {
        #[command(flatten)]
        query: ListArgs,
        /// Only the logged-in member's donations
        #[arg(long)]
        mine: bool,
    },
    /// Save the receipt of a successful donation
    Download {
        id: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReceiptsCommand {
    List {
        #[command(flatten)]
        query: ListArgs,
        #[arg(long)]
        mine: bool,
    },
    Download {
        id: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CertificatesCommand {
    List {
        #[command(flatten)]
        query: ListArgs,
        #[arg(long)]
        mine: bool,
    },
    /// Issue a certificate to an active, fee-paid member
    Generate {
        member_id: String,
        #[arg(long)]
        program: String,
        #[arg(long, value_enum, default_value_t = TemplateArg::Classic)]
        template: TemplateArg,
    },
    Download {
        id: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum NoticesCommand {
    List {
        #[command(flatten)]
        query: ListArgs,
        #[arg(long)]
        mine: bool,
    },
    /// Send to every active member, or to one with --to
    Send {
        #[arg(long)]
        title: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        content: String,
        /// Member id of a single recipient
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum OperatorsCommand {
    List(ListArgs),
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SAMITI_NEW_OPERATOR_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, value_enum, default_value_t = RoleArg::Manager)]
        role: RoleArg,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum PlansCommand {
    List(ListArgs),
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct DonateArgs {
    #[arg(long)]
    pub amount: Decimal,

    /// Donor name; without it the donation is made as the logged-in member
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub mobile: Option<String>,

    #[arg(long)]
    pub pan: Option<String>,

    /// Poll the payment status until it settles
    #[arg(long)]
    pub watch: bool,
}

#[derive(Subcommand, Debug)]
pub enum PaymentCommand {
    /// Poll a gateway order until it settles or the horizon passes
    Watch { order_id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateArg {
    Classic,
    Modern,
    Formal,
}

impl From<TemplateArg> for CertificateTemplate {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Classic => Self::Classic,
            TemplateArg::Modern => Self::Modern,
            TemplateArg::Formal => Self::Formal,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    Admin,
    Manager,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Self::Admin,
            RoleArg::Manager => Self::Manager,
        }
    }
}
