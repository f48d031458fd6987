//! Deep links into the Zendesk web UI.
//!
//! Tickets, users, and organizations open in the agent workspace; rules and
//! account objects open in the admin center. Admin center URLs follow the
//! current `/admin/...` layout; a few object kinds have no per-id page and
//! link to their list instead.

use crate::config::Instance;
use crate::search::SearchItem;

fn agent_root(instance: &Instance) -> String {
    format!("https://{}.zendesk.com/agent", instance.subdomain)
}

fn admin_root(instance: &Instance) -> String {
    format!("https://{}.zendesk.com/admin", instance.subdomain)
}

/// URL into the Zendesk web UI for one search result.
pub fn deep_link(instance: &Instance, item: &SearchItem) -> String {
    match item {
        SearchItem::Ticket(t) => format!("{}/tickets/{}", agent_root(instance), t.id),
        SearchItem::User(u) => format!("{}/users/{}", agent_root(instance), u.id),
        SearchItem::Organization(o) => {
            format!("{}/organizations/{}/tickets", agent_root(instance), o.id)
        }
        SearchItem::Group(_) => format!("{}/people/team/groups", admin_root(instance)),
        SearchItem::Trigger(t) => format!(
            "{}/objects-rules/rules/triggers/{}",
            admin_root(instance),
            t.id
        ),
        SearchItem::Macro(m) => format!(
            "{}/workspaces/agent-workspace/macros/{}",
            admin_root(instance),
            m.id
        ),
        SearchItem::TicketField(f) => format!(
            "{}/objects-rules/tickets/ticket-fields/{}",
            admin_root(instance),
            f.id
        ),
        SearchItem::TicketForm(f) => format!(
            "{}/objects-rules/tickets/ticket-forms/edit/{}",
            admin_root(instance),
            f.id
        ),
        SearchItem::SupportAddress(_) => {
            format!("{}/channels/talk_and_email/email", admin_root(instance))
        }
        SearchItem::Brand(_) => format!("{}/account/brand_management/brands", admin_root(instance)),
        SearchItem::Automation(a) => format!(
            "{}/objects-rules/rules/automations/{}",
            admin_root(instance),
            a.id
        ),
        SearchItem::CustomRole(r) => {
            format!("{}/people/team/roles/{}", admin_root(instance), r.id)
        }
        SearchItem::DynamicContent(d) => format!(
            "{}/workspaces/agent-workspace/dynamic_content/{}",
            admin_root(instance),
            d.id
        ),
        SearchItem::View(v) => format!(
            "{}/workspaces/agent-workspace/views/{}",
            admin_root(instance),
            v.id
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, Ticket, Trigger, User};

    fn instance() -> Instance {
        Instance::new("acme", "agent@acme.com", "tok")
    }

    fn ticket(id: u64) -> SearchItem {
        SearchItem::Ticket(Ticket {
            id,
            subject: None,
            description: None,
            status: None,
            priority: None,
            requester_id: None,
            assignee_id: None,
            group_id: None,
            organization_id: None,
            tags: vec![],
            created_at: None,
            updated_at: None,
        })
    }

    #[test]
    fn test_agent_links() {
        assert_eq!(
            deep_link(&instance(), &ticket(12345)),
            "https://acme.zendesk.com/agent/tickets/12345"
        );

        let user = SearchItem::User(User {
            id: 42,
            name: "Jane".into(),
            email: None,
            role: None,
            phone: None,
            organization_id: None,
            default_group_id: None,
            notes: None,
            details: None,
            suspended: false,
            verified: false,
            tags: vec![],
            time_zone: None,
            created_at: None,
            updated_at: None,
        });
        assert_eq!(
            deep_link(&instance(), &user),
            "https://acme.zendesk.com/agent/users/42"
        );
    }

    #[test]
    fn test_admin_links() {
        let trigger = SearchItem::Trigger(Trigger {
            id: 9,
            title: "Notify assignee".into(),
            active: true,
            description: None,
            position: None,
            category_id: None,
            created_at: None,
            updated_at: None,
        });
        assert_eq!(
            deep_link(&instance(), &trigger),
            "https://acme.zendesk.com/admin/objects-rules/rules/triggers/9"
        );

        // Groups have no per-id admin page; link to the list
        let group = SearchItem::Group(Group {
            id: 3,
            name: "Support".into(),
            description: None,
            default: false,
            deleted: false,
            created_at: None,
            updated_at: None,
        });
        assert_eq!(
            deep_link(&instance(), &group),
            "https://acme.zendesk.com/admin/people/team/groups"
        );
    }
}
