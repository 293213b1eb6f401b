//! Plain-text rendering of view models and slices

use std::fmt::Write as _;

use samiti_client::api::DashboardSummary;
use samiti_client::view::PaymentView;
use samiti_client::view::donations::DonationsView;
use samiti_client::view::members::MembersView;
use samiti_client::{RenderState, Session};
use shared::Pagination;
use shared::auth::Principal;
use shared::models::{Certificate, ContributionGroup, Member, Notice, NoticeRecipient, Operator, Receipt};

/// Header line for a list, or the message shown instead of rows
pub fn list_state(state: &RenderState) -> Option<String> {
    match state {
        RenderState::Loading => Some("Loading...".to_string()),
        RenderState::Failed(message) => Some(format!("Error: {}", message)),
        RenderState::Empty(message) => Some(message.clone()),
        RenderState::Ready => None,
    }
}

fn footer(pagination: &Pagination) -> String {
    format!(
        "Page {} of {} ({} total)",
        pagination.page,
        pagination.total_pages().max(1),
        pagination.total
    )
}

pub fn members(view: &MembersView, pagination: &Pagination) -> String {
    if let Some(message) = list_state(&view.state) {
        return message;
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<26} {:<14} {:<24} {:<9} {:<8} ACTIONS", "ID", "REG NO", "NAME", "STATUS", "FEE");
    for row in &view.rows {
        let actions: Vec<String> = row.actions.iter().map(|a| a.to_string()).collect();
        let _ = writeln!(
            out,
            "{:<26} {:<14} {:<24} {:<9} {:<8} {}",
            row.id,
            row.registration_number.as_deref().unwrap_or("-"),
            row.name,
            row.status.as_str(),
            format!("{:?}", row.payment_status).to_uppercase(),
            actions.join(", ")
        );
    }
    out.push_str(&footer(pagination));
    out
}

pub fn member_detail(member: &Member) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", member.full_name, member.id);
    if let Some(reg) = &member.registration_number {
        let _ = writeln!(out, "Registration: {}", reg);
    }
    let _ = writeln!(out, "Status:       {}", member.status.as_str());
    let _ = writeln!(out, "Fee:          {:?}", member.payment_status);
    let _ = writeln!(out, "Email:        {}", member.email);
    let _ = writeln!(out, "Mobile:       {}", member.mobile);
    let a = &member.address;
    let _ = writeln!(out, "Address:      {}, {}, {}, {} {}", a.line1, a.city, a.district, a.state, a.pin_code);
    if let Some(employment) = &member.employment {
        let _ = writeln!(out, "Employer:     {}", employment.employer);
    }
    for nominee in &member.nominees {
        let _ = writeln!(out, "Nominee:      {} ({}) {}%", nominee.name, nominee.relation, nominee.share);
    }
    if let Some(block) = &member.blocking {
        let _ = writeln!(
            out,
            "Blocked:      {} by {} on {}",
            block.reason,
            block.blocked_by.as_deref().unwrap_or("unknown"),
            block.blocked_at.format("%Y-%m-%d")
        );
    }
    out.trim_end().to_string()
}

pub fn donations(view: &DonationsView, pagination: &Pagination) -> String {
    if let Some(message) = list_state(&view.state) {
        return message;
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<26} {:<24} {:<8} {:>12} {:<8} RECEIPT", "ID", "DONOR", "KIND", "AMOUNT", "STATUS");
    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:<26} {:<24} {:<8} {:>12} {:<8} {}",
            row.id,
            row.donor,
            format!("{:?}", row.kind).to_uppercase(),
            row.amount,
            row.status.as_str(),
            row.receipt_number.as_deref().unwrap_or("-")
        );
    }
    let _ = writeln!(out, "Total received: {}", view.total);
    out.push_str(&footer(pagination));
    out
}

pub fn receipts(items: &[Receipt]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<26} {:<14} {:<24} {:>12} ISSUED", "ID", "NUMBER", "MEMBER", "AMOUNT");
    for r in items {
        let _ = writeln!(
            out,
            "{:<26} {:<14} {:<24} {:>12} {}",
            r.id,
            r.receipt_number,
            r.member_name.as_deref().unwrap_or(&r.member_id),
            r.amount,
            r.issued_at.format("%Y-%m-%d")
        );
    }
    out.trim_end().to_string()
}

pub fn certificates(items: &[Certificate]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<26} {:<14} {:<24} {:<24} ISSUED", "ID", "NUMBER", "MEMBER", "PROGRAM");
    for c in items {
        let _ = writeln!(
            out,
            "{:<26} {:<14} {:<24} {:<24} {}",
            c.id,
            c.certificate_number,
            c.member_name.as_deref().unwrap_or(&c.member_id),
            c.program_name,
            c.issued_at.format("%Y-%m-%d")
        );
    }
    out.trim_end().to_string()
}

pub fn notices(items: &[Notice]) -> String {
    let mut out = String::new();
    for n in items {
        let to = match &n.recipient {
            NoticeRecipient::AllActive => "all active members".to_string(),
            NoticeRecipient::Single { member_id } => member_id.clone(),
        };
        let _ = writeln!(out, "[{}] {} -> {}", n.sent_at.format("%Y-%m-%d %H:%M"), n.title, to);
        let _ = writeln!(out, "  {}", n.subject);
    }
    out.trim_end().to_string()
}

pub fn operators(items: &[Operator]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<26} {:<24} {:<32} ROLE", "ID", "NAME", "EMAIL");
    for o in items {
        let _ = writeln!(out, "{:<26} {:<24} {:<32} {}", o.id, o.name, o.email, o.role);
    }
    out.trim_end().to_string()
}

pub fn contribution_groups(items: &[ContributionGroup]) -> String {
    let mut out = String::new();
    for group in items {
        let _ = writeln!(out, "{} ({}) - {} plans", group.name, group.id, group.plan_count());
        for company in &group.companies {
            let _ = writeln!(out, "  {}", company.name);
            for department in &company.departments {
                let _ = writeln!(out, "    {}", department.name);
                for plan in &department.plans {
                    let _ = writeln!(
                        out,
                        "      {:<24} {:>10} {}",
                        plan.name,
                        plan.amount,
                        plan.frequency.as_deref().unwrap_or("")
                    );
                }
            }
        }
    }
    out.trim_end().to_string()
}

pub fn session(session: Option<&Session>) -> String {
    match session.map(|s| &s.principal) {
        None => "Not logged in".to_string(),
        Some(Principal::Operator { name, email, role, .. }) => {
            format!("{} <{}> ({})", name, email, role)
        }
        Some(principal) => format!("{} (member {})", principal.name(), principal.id()),
    }
}

pub fn dashboard(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    match &summary.profile {
        Some(member) => {
            let _ = writeln!(out, "{} - {}", member.full_name, member.status.as_str());
        }
        None => {
            let _ = writeln!(out, "Profile unavailable");
        }
    }
    let _ = writeln!(out, "Donations:    {} (total {})", summary.donations, summary.total_donated);
    let _ = writeln!(out, "Receipts:     {}", summary.receipts);
    let _ = writeln!(out, "Certificates: {}", summary.certificates);
    let _ = writeln!(out, "Notices:      {}", summary.notices);
    if !summary.failed.is_empty() {
        let _ = writeln!(out, "Could not load: {}", summary.failed.join(", "));
    }
    out.trim_end().to_string()
}

pub fn payment(view: &PaymentView) -> String {
    match &view.detail {
        Some(detail) => format!("{}: {}", view.headline, detail),
        None => view.headline.clone(),
    }
}
