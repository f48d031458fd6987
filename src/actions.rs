//! Per-entity action menus.
//!
//! A pure mapping from (search type, entity instance) to a fixed action
//! list: open the deep link, copy it, plus type-specific extras (a group's
//! memberships, editing a user). [`perform`] executes the browser/clipboard
//! kinds directly and hands everything else back to the host, which owns
//! sub-views and forms.

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Instance;
use crate::deep_link::deep_link;
use crate::notify::{self, Toast};
use crate::search::SearchItem;

/// What executing an action actually does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Open a URL with the system default browser
    OpenInBrowser { url: String },
    /// Put text on the clipboard
    CopyToClipboard { text: String },
    /// Host pushes the membership list sub-view for a group
    ShowMemberships { group_id: u64 },
    /// Host pushes the edit-user form
    EditUser { user_id: u64 },
    /// Host pushes the create-user form
    CreateUser,
    /// Host pushes the instance switcher
    SwitchInstance,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionCategory {
    EntityContext, // Actions specific to the focused search result
    EntityOps,     // Mutations (edit user, create user)
    GlobalOps,     // Instance switching etc.
}

/// One entry in the actions menu.
#[derive(Debug, Clone)]
pub struct Action {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: ActionCategory,
    /// Optional keyboard shortcut hint (e.g. "⌘C")
    pub shortcut: Option<String>,
    pub kind: ActionKind,
}

impl Action {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: ActionCategory,
        kind: ActionKind,
    ) -> Self {
        Action {
            id: id.into(),
            title: title.into(),
            description: None,
            category,
            shortcut: None,
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }
}

/// Actions for one focused search result.
pub fn entity_actions(instance: &Instance, item: &SearchItem) -> Vec<Action> {
    let url = deep_link(instance, item);

    let mut actions = vec![
        Action::new(
            "open_in_zendesk",
            "Open in Zendesk",
            ActionCategory::EntityContext,
            ActionKind::OpenInBrowser { url: url.clone() },
        )
        .with_description("Open in the default browser")
        .with_shortcut("↵"),
        Action::new(
            "copy_link",
            "Copy Link",
            ActionCategory::EntityContext,
            ActionKind::CopyToClipboard { text: url },
        )
        .with_shortcut("⌘C"),
    ];

    match item {
        SearchItem::Group(group) => {
            actions.push(
                Action::new(
                    "show_memberships",
                    "Show Memberships",
                    ActionCategory::EntityContext,
                    ActionKind::ShowMemberships { group_id: group.id },
                )
                .with_description("List the agents in this group"),
            );
        }
        SearchItem::User(user) => {
            if let Some(email) = &user.email {
                actions.push(
                    Action::new(
                        "copy_email",
                        "Copy Email",
                        ActionCategory::EntityContext,
                        ActionKind::CopyToClipboard {
                            text: email.clone(),
                        },
                    )
                    .with_shortcut("⌘E"),
                );
            }
            actions.push(
                Action::new(
                    "edit_user",
                    "Edit User",
                    ActionCategory::EntityOps,
                    ActionKind::EditUser { user_id: user.id },
                )
                .with_description("Update name, email, or contact details"),
            );
        }
        SearchItem::DynamicContent(content) => {
            if let Some(placeholder) = &content.placeholder {
                actions.push(
                    Action::new(
                        "copy_placeholder",
                        "Copy Placeholder",
                        ActionCategory::EntityContext,
                        ActionKind::CopyToClipboard {
                            text: placeholder.clone(),
                        },
                    )
                    .with_description("Copy the {{dc.*}} placeholder"),
                );
            }
        }
        SearchItem::SupportAddress(address) => {
            actions.push(Action::new(
                "copy_address",
                "Copy Address",
                ActionCategory::EntityContext,
                ActionKind::CopyToClipboard {
                    text: address.email.clone(),
                },
            ));
        }
        _ => {}
    }

    actions
}

/// Actions available regardless of the focused result.
pub fn global_actions() -> Vec<Action> {
    vec![
        Action::new(
            "create_user",
            "Create User",
            ActionCategory::EntityOps,
            ActionKind::CreateUser,
        )
        .with_shortcut("⌘N"),
        Action::new(
            "switch_instance",
            "Switch Instance",
            ActionCategory::GlobalOps,
            ActionKind::SwitchInstance,
        )
        .with_shortcut("⌘I"),
    ]
}

/// Result of [`perform`]: either this crate executed the action, or the
/// kind is the host's to interpret (sub-views, forms).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Performed {
    Done,
    Delegated(ActionKind),
}

/// Execute an action. Browser opens and clipboard writes happen here and
/// push a success toast; everything else is delegated back to the host.
/// Fire once, report result.
pub fn perform(action: &Action) -> Result<Performed> {
    match &action.kind {
        ActionKind::OpenInBrowser { url } => {
            info!(action = %action.id, url = %url, "Opening in browser");
            open::that(url).with_context(|| format!("could not open {}", url))?;
            Ok(Performed::Done)
        }
        ActionKind::CopyToClipboard { text } => {
            info!(action = %action.id, "Copying to clipboard");
            let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
            clipboard
                .set_text(text.clone())
                .context("clipboard write failed")?;
            notify::push(Toast::success("Copied to clipboard"));
            Ok(Performed::Done)
        }
        delegated => Ok(Performed::Delegated(delegated.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DynamicContent, Group, Ticket, User};

    fn instance() -> Instance {
        Instance::new("acme", "agent@acme.com", "tok")
    }

    fn user(id: u64, email: Option<&str>) -> SearchItem {
        SearchItem::User(User {
            id,
            name: "Jane".into(),
            email: email.map(str::to_string),
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
        })
    }

    #[test]
    fn test_every_entity_gets_open_and_copy() {
        let item = SearchItem::Ticket(Ticket {
            id: 1,
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
        });
        let actions = entity_actions(&instance(), &item);
        assert!(actions.iter().any(|a| a.id == "open_in_zendesk"));
        assert!(actions.iter().any(|a| a.id == "copy_link"));

        let copy = actions.iter().find(|a| a.id == "copy_link").unwrap();
        assert_eq!(
            copy.kind,
            ActionKind::CopyToClipboard {
                text: "https://acme.zendesk.com/agent/tickets/1".to_string()
            }
        );
    }

    #[test]
    fn test_group_gets_memberships_action() {
        let group = SearchItem::Group(Group {
            id: 77,
            name: "Support".into(),
            description: None,
            default: false,
            deleted: false,
            created_at: None,
            updated_at: None,
        });
        let actions = entity_actions(&instance(), &group);
        let memberships = actions.iter().find(|a| a.id == "show_memberships").unwrap();
        assert_eq!(memberships.kind, ActionKind::ShowMemberships { group_id: 77 });
    }

    #[test]
    fn test_user_actions_depend_on_email() {
        let with_email = entity_actions(&instance(), &user(1, Some("jane@example.com")));
        assert!(with_email.iter().any(|a| a.id == "copy_email"));
        assert!(with_email.iter().any(|a| a.id == "edit_user"));

        let without_email = entity_actions(&instance(), &user(1, None));
        assert!(!without_email.iter().any(|a| a.id == "copy_email"));
        assert!(without_email.iter().any(|a| a.id == "edit_user"));
    }

    #[test]
    fn test_dynamic_content_copies_placeholder() {
        let item = SearchItem::DynamicContent(DynamicContent {
            id: 5,
            name: "greeting".into(),
            placeholder: Some("{{dc.greeting}}".into()),
            default_locale_id: None,
            variants: vec![],
            created_at: None,
            updated_at: None,
        });
        let actions = entity_actions(&instance(), &item);
        let copy = actions.iter().find(|a| a.id == "copy_placeholder").unwrap();
        assert_eq!(
            copy.kind,
            ActionKind::CopyToClipboard {
                text: "{{dc.greeting}}".to_string()
            }
        );
    }

    #[test]
    fn test_global_actions() {
        let actions = global_actions();
        assert!(actions.iter().any(|a| a.id == "create_user"));
        assert!(actions.iter().any(|a| a.id == "switch_instance"));
    }

    #[test]
    fn test_perform_delegates_host_kinds() {
        let action = Action::new(
            "edit_user",
            "Edit User",
            ActionCategory::EntityOps,
            ActionKind::EditUser { user_id: 9 },
        );
        assert_eq!(
            perform(&action).unwrap(),
            Performed::Delegated(ActionKind::EditUser { user_id: 9 })
        );
    }
}
