//! Command dispatch

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, bail};
use samiti_client::api::{RegistrationForm, RegistrationWizard};
use samiti_client::view::PaymentView;
use samiti_client::view::donations::donations_view;
use samiti_client::view::members::members_view;
use samiti_client::{
    ClientConfig, ClientError, HttpClient, ListQuery, SamitiApi, WatchState, WatcherConfig,
};
use shared::models::{DonorSnapshot, NoticeDraft, NoticeRecipient, OperatorCreate};
use shared::permissions::can;
use shared::{Action, Role};

use crate::cli::{
    CertificatesCommand, Cli, Command, DonationsCommand, ListArgs, LoginArgs, MembersCommand,
    NoticesCommand, OperatorsCommand, PaymentCommand, PlansCommand, ReceiptsCommand,
};
use crate::render;

/// Turn a client error into a report with its field problems listed
fn report(err: ClientError) -> anyhow::Error {
    let mut message = err.message();
    if let Some(fields) = err.field_errors() {
        for (field, problem) in fields {
            message.push_str(&format!("\n  {}: {}", field, problem));
        }
    }
    if err.is_unauthorized() {
        message.push_str("\nRun `samiti login` first.");
    }
    anyhow::anyhow!(message)
}

impl From<&ListArgs> for ListQuery {
    fn from(args: &ListArgs) -> Self {
        let mut query = ListQuery::all();
        if args.page.is_some() || args.limit.is_some() {
            query = query.paginate(args.page.unwrap_or(1), args.limit.unwrap_or(20));
        }
        if let Some(status) = &args.status {
            query = query.with_status(status.to_uppercase());
        }
        if let Some(search) = &args.search {
            query = query.with_search(search.as_str());
        }
        query
    }
}

/// Refuse actions the logged-in operator's role does not offer
pub fn check_role(role: Option<Role>, action: Action) -> anyhow::Result<()> {
    match role {
        None => bail!("Log in as an operator to {}", action),
        Some(role) if !can(role, action) => bail!("Your role ({}) cannot {}", role, action),
        Some(_) => Ok(()),
    }
}

/// Destructive actions need `--yes` or an interactive confirmation
fn confirm(action: Action, target: &str, assume_yes: bool) -> anyhow::Result<()> {
    if assume_yes || !action.requires_confirmation() {
        return Ok(());
    }
    print!("Really {} {}? Type 'yes' to continue: ", action, target);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    if answer.trim().eq_ignore_ascii_case("yes") {
        Ok(())
    } else {
        bail!("Cancelled")
    }
}

struct Console<'a, C> {
    api: &'a SamitiApi<C>,
    config: &'a ClientConfig,
    assume_yes: bool,
}

pub async fn run<C: HttpClient + 'static>(
    cli: Cli,
    api: &SamitiApi<C>,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    let console = Console {
        api,
        config,
        assume_yes: cli.yes,
    };
    match cli.command {
        Command::Login(args) => console.login(args).await,
        Command::Logout => {
            api.auth.logout().map_err(report)?;
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            println!("{}", render::session(api.auth.whoami().as_ref()));
            Ok(())
        }
        Command::Members(cmd) => console.members(cmd).await,
        Command::Donations(cmd) => console.donations(cmd).await,
        Command::Receipts(cmd) => console.receipts(cmd).await,
        Command::Certificates(cmd) => console.certificates(cmd).await,
        Command::Notices(cmd) => console.notices(cmd).await,
        Command::Operators(cmd) => console.operators(cmd).await,
        Command::Plans(cmd) => console.plans(cmd).await,
        Command::Dashboard => {
            let summary = api.member_dashboard().load().await;
            println!("{}", render::dashboard(&summary));
            Ok(())
        }
        Command::Register { form, watch } => console.register(&form, watch).await,
        Command::Donate(args) => console.donate(args).await,
        Command::Payment(PaymentCommand::Watch { order_id }) => console.watch_payment(&order_id).await,
    }
}

impl<C: HttpClient + 'static> Console<'_, C> {
    fn role(&self) -> Option<Role> {
        self.api.http().session().role()
    }

    /// Role gate, then confirmation
    fn authorize(&self, action: Action, target: &str) -> anyhow::Result<()> {
        check_role(self.role(), action)?;
        confirm(action, target, self.assume_yes)
    }

    async fn login(&self, args: LoginArgs) -> anyhow::Result<()> {
        let session = match (&args.email, &args.member) {
            (Some(email), _) => self.api.auth.login_operator(email, &args.password).await,
            (None, Some(identifier)) => self.api.auth.login_member(identifier, &args.password).await,
            (None, None) => bail!("Pass --email or --member"),
        }
        .map_err(report)?;
        println!("Logged in as {}", render::session(Some(&session)));
        Ok(())
    }

    async fn members(&self, cmd: MembersCommand) -> anyhow::Result<()> {
        let members = &self.api.members;
        match cmd {
            MembersCommand::List(args) => {
                members.list(&ListQuery::from(&args)).await.map_err(report)?;
                let slice = members.slice().snapshot();
                let view = members_view(&slice, self.role());
                println!("{}", render::members(&view, &slice.pagination));
            }
            MembersCommand::Show { id } => {
                let member = members.get(&id).await.map_err(report)?;
                println!("{}", render::member_detail(&member));
            }
            MembersCommand::Me => {
                let member = members.my_profile().await.map_err(report)?;
                println!("{}", render::member_detail(&member));
            }
            MembersCommand::Delete { id } => {
                self.authorize(Action::Delete, &format!("member {}", id))?;
                members.delete(&id).await.map_err(report)?;
                println!("Member {} deleted", id);
            }
            status_change => return self.change_member_status(status_change).await,
        }
        Ok(())
    }

    async fn change_member_status(&self, cmd: MembersCommand) -> anyhow::Result<()> {
        let (action, id) = match &cmd {
            MembersCommand::Verify { id } => (Action::Verify, id.clone()),
            MembersCommand::Reject { id, .. } => (Action::Reject, id.clone()),
            MembersCommand::Block { id, .. } => (Action::Block, id.clone()),
            MembersCommand::Unblock { id } => (Action::Unblock, id.clone()),
            MembersCommand::Deactivate { id } => (Action::Deactivate, id.clone()),
            MembersCommand::Reactivate { id } => (Action::Reactivate, id.clone()),
            other => bail!("{:?} is not a status change", other),
        };
        self.authorize(action, &format!("member {}", id))?;

        let members = &self.api.members;
        // caches the current status so illegal transitions fail locally
        members.get(&id).await.map_err(report)?;
        let result = match cmd {
            MembersCommand::Verify { id } => members.verify(&id).await,
            MembersCommand::Reject { id, reason } => members.reject(&id, reason).await,
            MembersCommand::Block { id, reason } => members.block(&id, reason).await,
            MembersCommand::Unblock { id } => members.unblock(&id).await,
            MembersCommand::Deactivate { id } => members.deactivate(&id).await,
            MembersCommand::Reactivate { id } => members.reactivate(&id).await,
            _ => Ok(()),
        };
        result.map_err(report)?;

        let status = members
            .slice()
            .with(|slice| slice.selected.as_ref().map(|m| m.status.as_str()));
        println!("Member {}: {}", id, status.unwrap_or("updated"));
        Ok(())
    }

    async fn donations(&self, cmd: DonationsCommand) -> anyhow::Result<()> {
        let donations = &self.api.donations;
        match cmd {
            DonationsCommand::List { query, mine } => {
                let query = ListQuery::from(&query);
                let fetched = if mine {
                    donations.my_donations(&query).await
                } else {
                    donations.list(&query).await
                };
                fetched.map_err(report)?;
                let slice = donations.slice().snapshot();
                println!("{}", render::donations(&donations_view(&slice), &slice.pagination));
            }
            DonationsCommand::Download { id, dir } => {
                let donation = donations.get(&id).await.map_err(report)?;
                let path = donations
                    .download_receipt(&donation, &dir)
                    .await
                    .map_err(report)?;
                println!("Saved {}", path.display());
            }
        }
        Ok(())
    }

    async fn receipts(&self, cmd: ReceiptsCommand) -> anyhow::Result<()> {
        let receipts = &self.api.receipts;
        match cmd {
            ReceiptsCommand::List { query, mine } => {
                let query = ListQuery::from(&query);
                let fetched = if mine {
                    receipts.my_receipts(&query).await
                } else {
                    receipts.list(&query).await
                };
                fetched.map_err(report)?;
                print_list(&receipts.slice().snapshot(), "No receipts found", render::receipts);
            }
            ReceiptsCommand::Download { id, dir } => {
                let receipt = receipts.get(&id).await.map_err(report)?;
                let path = receipts.download(&receipt, &dir).await.map_err(report)?;
                println!("Saved {}", path.display());
            }
            ReceiptsCommand::Delete { id } => {
                self.authorize(Action::Delete, &format!("receipt {}", id))?;
                receipts.delete(&id).await.map_err(report)?;
                println!("Receipt {} deleted", id);
            }
        }
        Ok(())
    }

    async fn certificates(&self, cmd: CertificatesCommand) -> anyhow::Result<()> {
        let certificates = &self.api.certificates;
        match cmd {
            CertificatesCommand::List { query, mine } => {
                let query = ListQuery::from(&query);
                let fetched = if mine {
                    certificates.my_certificates(&query).await
                } else {
                    certificates.list(&query).await
                };
                fetched.map_err(report)?;
                print_list(&certificates.slice().snapshot(), "No certificates issued", render::certificates);
            }
            CertificatesCommand::Generate {
                member_id,
                program,
                template,
            } => {
                check_role(self.role(), Action::GenerateCertificate)?;
                let member = self.api.members.get(&member_id).await.map_err(report)?;
                let certificate = certificates
                    .generate(&member, &program, template.into())
                    .await
                    .map_err(report)?;
                println!(
                    "Issued {} to {}",
                    certificate.certificate_number, member.full_name
                );
            }
            CertificatesCommand::Download { id, dir } => {
                let certificate = certificates.get(&id).await.map_err(report)?;
                let path = certificates.download(&certificate, &dir).await.map_err(report)?;
                println!("Saved {}", path.display());
            }
        }
        Ok(())
    }

    async fn notices(&self, cmd: NoticesCommand) -> anyhow::Result<()> {
        let notices = &self.api.notices;
        match cmd {
            NoticesCommand::List { query, mine } => {
                let query = ListQuery::from(&query);
                let fetched = if mine {
                    notices.my_notices(&query).await
                } else {
                    notices.list(&query).await
                };
                fetched.map_err(report)?;
                print_list(&notices.slice().snapshot(), "No notices", render::notices);
            }
            NoticesCommand::Send {
                title,
                subject,
                content,
                to,
            } => {
                check_role(self.role(), Action::SendNotice)?;
                let recipient = match to {
                    Some(member_id) => NoticeRecipient::Single { member_id },
                    None => NoticeRecipient::AllActive,
                };
                let notice = notices
                    .send(NoticeDraft {
                        title,
                        subject,
                        content,
                        recipient,
                    })
                    .await
                    .map_err(report)?;
                println!("Notice {} sent", notice.id);
            }
        }
        Ok(())
    }

    async fn operators(&self, cmd: OperatorsCommand) -> anyhow::Result<()> {
        let operators = &self.api.operators;
        match cmd {
            OperatorsCommand::List(args) => {
                operators.list(&ListQuery::from(&args)).await.map_err(report)?;
                print_list(&operators.slice().snapshot(), "No operators", render::operators);
            }
            OperatorsCommand::Create {
                name,
                email,
                password,
                role,
            } => {
                let operator = operators
                    .create(OperatorCreate {
                        name,
                        email,
                        password,
                        role: role.into(),
                    })
                    .await
                    .map_err(report)?;
                println!("Created {} <{}> ({})", operator.name, operator.email, operator.role);
            }
            OperatorsCommand::Delete { id } => {
                self.authorize(Action::Delete, &format!("operator {}", id))?;
                operators.delete(&id).await.map_err(report)?;
                println!("Operator {} deleted", id);
            }
        }
        Ok(())
    }

    async fn plans(&self, cmd: PlansCommand) -> anyhow::Result<()> {
        let groups = &self.api.contributions;
        match cmd {
            PlansCommand::List(args) => {
                groups.list(&ListQuery::from(&args)).await.map_err(report)?;
                print_list(&groups.slice().snapshot(), "No contribution groups", render::contribution_groups);
            }
            PlansCommand::Delete { id } => {
                check_role(self.role(), Action::EditPlans)?;
                confirm(Action::Delete, &format!("contribution group {}", id), self.assume_yes)?;
                groups.delete(&id).await.map_err(report)?;
                println!("Contribution group {} deleted", id);
            }
        }
        Ok(())
    }

    async fn register(&self, path: &Path, watch: bool) -> anyhow::Result<()> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let form: RegistrationForm =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

        // walk the steps so problems are reported against the first bad one
        let mut wizard = RegistrationWizard::with_form(form);
        while !wizard.is_last_step() {
            let step = wizard.step();
            wizard
                .advance()
                .map_err(|e| report(e).context(format!("{} step is incomplete", step.title())))?;
        }

        let outcome = self
            .api
            .registration
            .submit(&mut wizard)
            .await
            .map_err(report)?;
        let member = &outcome.member;
        println!(
            "Registered {} ({})",
            member.full_name,
            member.registration_number.as_deref().unwrap_or(&member.id)
        );
        match outcome.fee_order {
            Some(order) => {
                println!("Registration fee: order {} for {} {}", order.order_id, order.amount, order.currency);
                if let Some(url) = &order.checkout_url {
                    println!("Complete the payment at {}", url);
                }
                if watch {
                    self.watch_payment(&order.order_id).await?;
                }
            }
            None => println!("Awaiting verification by the samiti"),
        }
        Ok(())
    }

    async fn donate(&self, args: crate::cli::DonateArgs) -> anyhow::Result<()> {
        let donations = &self.api.donations;
        let order = match args.name {
            Some(name) => {
                let donor = DonorSnapshot {
                    name,
                    email: args.email,
                    mobile: args.mobile,
                    pan: args.pan,
                };
                donations.donate_as_visitor(args.amount, donor).await
            }
            None => {
                if !self.api.http().session().is_authenticated() {
                    bail!("Pass --name to donate as a visitor, or log in as a member");
                }
                donations.donate_as_member(args.amount).await
            }
        }
        .map_err(report)?;

        println!("Order {} for {} {}", order.order_id, order.amount, order.currency);
        if let Some(url) = &order.checkout_url {
            println!("Complete the payment at {}", url);
        }
        if args.watch {
            self.watch_payment(&order.order_id).await?;
        }
        Ok(())
    }

    /// Print each status change until the payment settles or Ctrl-C
    async fn watch_payment(&self, order_id: &str) -> anyhow::Result<()> {
        let mut handle = self
            .api
            .payments
            .watcher(WatcherConfig::from(self.config))
            .start(order_id);
        let mut states = handle.subscribe();
        println!("{}", render::payment(&PaymentView::from(&WatchState::Idle)));

        loop {
            let state = states.borrow_and_update().clone();
            if let WatchState::Polling { attempts } = state {
                tracing::debug!(order_id, attempts, "Verifying payment");
            }
            if state.is_terminal() {
                break;
            }
            tokio::select! {
                changed = states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    handle.cancel();
                    println!("Stopped watching order {}", order_id);
                    return Ok(());
                }
            }
        }

        let view = PaymentView::from(&handle.finished().await);
        if view.is_error {
            bail!(render::payment(&view));
        }
        println!("{}", render::payment(&view));
        Ok(())
    }
}

fn print_list<T: samiti_client::Resource>(
    slice: &samiti_client::ResourceSlice<T>,
    empty_message: &str,
    rows: impl Fn(&[T]) -> String,
) {
    match render::list_state(&samiti_client::RenderState::of_list(slice, empty_message)) {
        Some(message) => println!("{}", message),
        None => println!("{}", rows(&slice.items)),
    }
}
