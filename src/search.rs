//! Entity search dispatch.
//!
//! One entry point, [`dispatch`], routes a (search type, query) pair to the
//! right REST endpoint and returns a homogeneous list of [`SearchItem`]s.
//! The search types split three ways, modeled as capability flags on the
//! type rather than scattered switches:
//!
//! - **Server-filtered** (`supports_server_filter`): one filtered request
//!   per debounced keystroke (`/users/search.json`, `/search.json` with
//!   Zendesk search syntax for tickets, ...). These require a non-empty
//!   query; an empty query returns an empty list without touching the
//!   network.
//! - **Session-cached** (`session_cached`): dynamic content, support
//!   addresses, groups, automations, and custom roles either lack server
//!   text search or are small enough to fetch whole. Their collections are
//!   fetched once per instance (see [`crate::session`]) and substring-
//!   filtered locally.
//! - **Neither**: ticket fields, ticket forms, and brands have no server
//!   text search; their collections are refetched per debounced keystroke
//!   and filtered locally.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::ZendeskClient;
use crate::error::Result;
use crate::models::*;
use crate::session::SessionCache;

/// Closed enumeration of the Zendesk entity kinds the palette can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchType {
    Tickets,
    Users,
    Organizations,
    Groups,
    Triggers,
    Macros,
    TicketFields,
    TicketForms,
    SupportAddresses,
    Brands,
    Automations,
    CustomRoles,
    DynamicContent,
    Views,
}

impl SearchType {
    pub const ALL: [SearchType; 14] = [
        SearchType::Tickets,
        SearchType::Users,
        SearchType::Organizations,
        SearchType::Groups,
        SearchType::Triggers,
        SearchType::Macros,
        SearchType::TicketFields,
        SearchType::TicketForms,
        SearchType::SupportAddresses,
        SearchType::Brands,
        SearchType::Automations,
        SearchType::CustomRoles,
        SearchType::DynamicContent,
        SearchType::Views,
    ];

    /// Label for the palette's search-type dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            SearchType::Tickets => "Tickets",
            SearchType::Users => "Users",
            SearchType::Organizations => "Organizations",
            SearchType::Groups => "Groups",
            SearchType::Triggers => "Triggers",
            SearchType::Macros => "Macros",
            SearchType::TicketFields => "Ticket Fields",
            SearchType::TicketForms => "Ticket Forms",
            SearchType::SupportAddresses => "Support Addresses",
            SearchType::Brands => "Brands",
            SearchType::Automations => "Automations",
            SearchType::CustomRoles => "Custom Roles",
            SearchType::DynamicContent => "Dynamic Content",
            SearchType::Views => "Views",
        }
    }

    /// Whether the REST API can text-filter this type server-side.
    pub fn supports_server_filter(&self) -> bool {
        matches!(
            self,
            SearchType::Tickets
                | SearchType::Users
                | SearchType::Organizations
                | SearchType::Triggers
                | SearchType::Macros
                | SearchType::Views
        )
    }

    /// Whether the full collection is fetched once per instance and kept
    /// for the session.
    pub fn session_cached(&self) -> bool {
        matches!(
            self,
            SearchType::DynamicContent
                | SearchType::SupportAddresses
                | SearchType::Groups
                | SearchType::Automations
                | SearchType::CustomRoles
        )
    }

    /// Whether the server search demands non-empty input. Ticket search is
    /// the exception handled in [`dispatch`]: filters alone are enough.
    pub fn requires_query(&self) -> bool {
        self.supports_server_filter()
    }
}

/// One search result, tagged with the entity it wraps.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchItem {
    Ticket(Ticket),
    User(User),
    Organization(Organization),
    Group(Group),
    Trigger(Trigger),
    Macro(Macro),
    TicketField(TicketField),
    TicketForm(TicketForm),
    SupportAddress(SupportAddress),
    Brand(Brand),
    Automation(Automation),
    CustomRole(CustomRole),
    DynamicContent(DynamicContent),
    View(View),
}

impl SearchItem {
    pub fn search_type(&self) -> SearchType {
        match self {
            SearchItem::Ticket(_) => SearchType::Tickets,
            SearchItem::User(_) => SearchType::Users,
            SearchItem::Organization(_) => SearchType::Organizations,
            SearchItem::Group(_) => SearchType::Groups,
            SearchItem::Trigger(_) => SearchType::Triggers,
            SearchItem::Macro(_) => SearchType::Macros,
            SearchItem::TicketField(_) => SearchType::TicketFields,
            SearchItem::TicketForm(_) => SearchType::TicketForms,
            SearchItem::SupportAddress(_) => SearchType::SupportAddresses,
            SearchItem::Brand(_) => SearchType::Brands,
            SearchItem::Automation(_) => SearchType::Automations,
            SearchItem::CustomRole(_) => SearchType::CustomRoles,
            SearchItem::DynamicContent(_) => SearchType::DynamicContent,
            SearchItem::View(_) => SearchType::Views,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            SearchItem::Ticket(t) => t.id,
            SearchItem::User(u) => u.id,
            SearchItem::Organization(o) => o.id,
            SearchItem::Group(g) => g.id,
            SearchItem::Trigger(t) => t.id,
            SearchItem::Macro(m) => m.id,
            SearchItem::TicketField(f) => f.id,
            SearchItem::TicketForm(f) => f.id,
            SearchItem::SupportAddress(a) => a.id,
            SearchItem::Brand(b) => b.id,
            SearchItem::Automation(a) => a.id,
            SearchItem::CustomRole(r) => r.id,
            SearchItem::DynamicContent(d) => d.id,
            SearchItem::View(v) => v.id,
        }
    }

    /// Display name for the result row. Also what local substring filtering
    /// matches against.
    pub fn name(&self) -> &str {
        match self {
            SearchItem::Ticket(t) => t.subject.as_deref().unwrap_or("(no subject)"),
            SearchItem::User(u) => &u.name,
            SearchItem::Organization(o) => &o.name,
            SearchItem::Group(g) => &g.name,
            SearchItem::Trigger(t) => &t.title,
            SearchItem::Macro(m) => &m.title,
            SearchItem::TicketField(f) => &f.title,
            SearchItem::TicketForm(f) => &f.name,
            SearchItem::SupportAddress(a) => &a.email,
            SearchItem::Brand(b) => &b.name,
            SearchItem::Automation(a) => &a.title,
            SearchItem::CustomRole(r) => &r.name,
            SearchItem::DynamicContent(d) => &d.name,
            SearchItem::View(v) => &v.title,
        }
    }

    /// Secondary line for the result row.
    pub fn description(&self) -> Option<String> {
        match self {
            SearchItem::Ticket(t) => {
                let status = t.status.map(|s| s.label().to_string());
                match (status, &t.priority) {
                    (Some(s), Some(p)) => Some(format!("{} · {}", s, p)),
                    (Some(s), None) => Some(s),
                    (None, Some(p)) => Some(p.clone()),
                    (None, None) => None,
                }
            }
            SearchItem::User(u) => u.email.clone(),
            SearchItem::Organization(o) => {
                if o.domain_names.is_empty() {
                    None
                } else {
                    Some(o.domain_names.join(", "))
                }
            }
            SearchItem::Group(g) => g.description.clone(),
            SearchItem::Trigger(t) => t.description.clone(),
            SearchItem::Macro(m) => m.description.clone(),
            SearchItem::TicketField(f) => Some(f.field_type.clone()),
            SearchItem::TicketForm(f) => f.position.map(|p| format!("position {}", p)),
            SearchItem::SupportAddress(a) => a.name.clone(),
            SearchItem::Brand(b) => b.subdomain.clone(),
            SearchItem::Automation(_) => None,
            SearchItem::CustomRole(r) => r.description.clone(),
            SearchItem::DynamicContent(d) => d.placeholder.clone(),
            SearchItem::View(v) => v.description.clone(),
        }
    }
}

/// Optional clauses composed onto a ticket search, in declaration order:
/// requester, group, organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilters {
    pub requester_email: Option<String>,
    pub group_id: Option<u64>,
    pub organization_id: Option<u64>,
}

impl TicketFilters {
    pub fn is_empty(&self) -> bool {
        self.requester_email.is_none() && self.group_id.is_none() && self.organization_id.is_none()
    }

    /// Compose the Zendesk search-syntax query string:
    /// `type:ticket <text> requester:<email> group:<id> organization:<id>`.
    pub fn compose(&self, text: &str) -> String {
        let mut clauses = vec!["type:ticket".to_string()];
        if !text.trim().is_empty() {
            clauses.push(text.trim().to_string());
        }
        if let Some(email) = &self.requester_email {
            clauses.push(format!("requester:{}", email));
        }
        if let Some(id) = self.group_id {
            clauses.push(format!("group:{}", id));
        }
        if let Some(id) = self.organization_id {
            clauses.push(format!("organization:{}", id));
        }
        clauses.join(" ")
    }
}

/// Full-collection fetches stop following `next_page` after this many pages.
const MAX_COLLECTION_PAGES: usize = 10;

/// Route a query to the endpoint for its search type.
///
/// `filters` only applies to [`SearchType::Tickets`] and is ignored
/// elsewhere. An empty query against a type that requires one returns
/// `Ok(vec![])` without issuing a request.
pub fn dispatch(
    client: &ZendeskClient,
    cache: &SessionCache,
    ty: SearchType,
    query: &str,
    filters: Option<&TicketFilters>,
) -> Result<Vec<SearchItem>> {
    let query = query.trim();
    debug!(
        search_type = ty.label(),
        query_len = query.len(),
        "Dispatching search"
    );

    match ty {
        SearchType::Tickets => {
            let filters = filters.cloned().unwrap_or_default();
            if query.is_empty() && filters.is_empty() {
                return Ok(Vec::new());
            }
            let composed = filters.compose(query);
            let items = server_search::<Ticket>(client, "/search.json", "query", &composed, "results")?;
            Ok(items.into_iter().map(SearchItem::Ticket).collect())
        }
        _ if ty.requires_query() && query.is_empty() => Ok(Vec::new()),
        SearchType::Users => {
            let items = server_search::<User>(client, "/users/search.json", "query", query, "users")?;
            Ok(items.into_iter().map(SearchItem::User).collect())
        }
        SearchType::Organizations => {
            let items = server_search::<Organization>(
                client,
                "/organizations/autocomplete.json",
                "name",
                query,
                "organizations",
            )?;
            Ok(items.into_iter().map(SearchItem::Organization).collect())
        }
        SearchType::Triggers => {
            let items =
                server_search::<Trigger>(client, "/triggers/search.json", "query", query, "triggers")?;
            Ok(items.into_iter().map(SearchItem::Trigger).collect())
        }
        SearchType::Macros => {
            let items =
                server_search::<Macro>(client, "/macros/search.json", "query", query, "macros")?;
            Ok(items.into_iter().map(SearchItem::Macro).collect())
        }
        SearchType::Views => {
            let items = server_search::<View>(client, "/views/search.json", "query", query, "views")?;
            Ok(items.into_iter().map(SearchItem::View).collect())
        }
        _ if ty.session_cached() => {
            let collection = cache.collection(client, ty)?;
            Ok(filter_by_name(&collection, query))
        }
        // Ticket fields, ticket forms, brands: no server text search, small
        // collections, refetched per debounced keystroke.
        _ => {
            let collection = fetch_collection_items(client, ty)?;
            Ok(filter_by_name(&collection, query))
        }
    }
}

/// Memberships of one group, resolved lazily from a group result.
pub fn list_group_memberships(client: &ZendeskClient, group_id: u64) -> Result<Vec<GroupMembership>> {
    fetch_pages(
        client,
        &format!("/groups/{}/memberships.json", group_id),
        "group_memberships",
    )
}

/// Case-insensitive substring filter on the item name. An empty query
/// returns the full collection.
pub fn filter_by_name(items: &[SearchItem], query: &str) -> Vec<SearchItem> {
    let query = query.trim();
    if query.is_empty() {
        return items.to_vec();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.name().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Fetch the full collection for a type with no server-side text search.
pub(crate) fn fetch_collection_items(
    client: &ZendeskClient,
    ty: SearchType,
) -> Result<Vec<SearchItem>> {
    let items = match ty {
        SearchType::Groups => fetch_pages::<Group>(client, "/groups.json", "groups")?
            .into_iter()
            .map(SearchItem::Group)
            .collect(),
        SearchType::SupportAddresses => {
            fetch_pages::<SupportAddress>(client, "/recipient_addresses.json", "recipient_addresses")?
                .into_iter()
                .map(SearchItem::SupportAddress)
                .collect()
        }
        SearchType::Automations => fetch_pages::<Automation>(client, "/automations.json", "automations")?
            .into_iter()
            .map(SearchItem::Automation)
            .collect(),
        SearchType::CustomRoles => fetch_pages::<CustomRole>(client, "/custom_roles.json", "custom_roles")?
            .into_iter()
            .map(SearchItem::CustomRole)
            .collect(),
        SearchType::DynamicContent => {
            fetch_pages::<DynamicContent>(client, "/dynamic_content/items.json", "items")?
                .into_iter()
                .map(SearchItem::DynamicContent)
                .collect()
        }
        SearchType::TicketFields => fetch_pages::<TicketField>(client, "/ticket_fields.json", "ticket_fields")?
            .into_iter()
            .map(SearchItem::TicketField)
            .collect(),
        SearchType::TicketForms => fetch_pages::<TicketForm>(client, "/ticket_forms.json", "ticket_forms")?
            .into_iter()
            .map(SearchItem::TicketForm)
            .collect(),
        SearchType::Brands => fetch_pages::<Brand>(client, "/brands.json", "brands")?
            .into_iter()
            .map(SearchItem::Brand)
            .collect(),
        other => {
            return Err(crate::error::ZendeskError::Config(format!(
                "{} is searched server-side, not fetched as a collection",
                other.label()
            )))
        }
    };
    Ok(items)
}

/// One filtered request against a search endpoint.
fn server_search<T: DeserializeOwned>(
    client: &ZendeskClient,
    path: &str,
    param: &str,
    query: &str,
    envelope_key: &str,
) -> Result<Vec<T>> {
    let value = client.get(path, &[(param, query)])?;
    parse_list(&value, envelope_key)
}

/// Fetch a collection endpoint, following `next_page` links up to the page
/// cap.
fn fetch_pages<T: DeserializeOwned>(
    client: &ZendeskClient,
    path: &str,
    envelope_key: &str,
) -> Result<Vec<T>> {
    let mut value = client.get(path, &[])?;
    let mut all = parse_list::<T>(&value, envelope_key)?;
    let mut pages = 1;

    while let Some(next) = value
        .get("next_page")
        .and_then(Value::as_str)
        .map(str::to_owned)
    {
        if pages >= MAX_COLLECTION_PAGES {
            warn!(
                path = path,
                pages = pages,
                fetched = all.len(),
                "Collection fetch hit the page cap, returning a truncated collection"
            );
            break;
        }
        value = client.get_url(&next)?;
        all.extend(parse_list::<T>(&value, envelope_key)?);
        pages += 1;
    }

    Ok(all)
}

/// Pull the entity array out of a list envelope. Every list endpoint wraps
/// its array under a per-endpoint key (`results`, `users`, `items`, ...);
/// a missing key normalizes to an empty list.
fn parse_list<T: DeserializeOwned>(value: &Value, key: &str) -> Result<Vec<T>> {
    match value.get(key) {
        Some(array) => Ok(serde_json::from_value(array.clone())?),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Instance;

    fn test_client() -> ZendeskClient {
        ZendeskClient::new(Instance::new("acme", "agent@acme.com", "tok")).unwrap()
    }

    fn group_item(id: u64, name: &str) -> SearchItem {
        SearchItem::Group(Group {
            id,
            name: name.to_string(),
            description: None,
            default: false,
            deleted: false,
            created_at: None,
            updated_at: None,
        })
    }

    #[test]
    fn test_ticket_filters_compose_in_declaration_order() {
        let filters = TicketFilters {
            requester_email: Some("jane@example.com".to_string()),
            group_id: Some(42),
            organization_id: None,
        };
        let composed = filters.compose("printer broken");
        assert_eq!(
            composed,
            "type:ticket printer broken requester:jane@example.com group:42"
        );

        // requester comes before group, space-separated
        let requester_pos = composed.find("requester:jane@example.com").unwrap();
        let group_pos = composed.find("group:42").unwrap();
        assert!(requester_pos < group_pos);
    }

    #[test]
    fn test_ticket_filters_compose_without_text() {
        let filters = TicketFilters {
            requester_email: None,
            group_id: None,
            organization_id: Some(7),
        };
        assert_eq!(filters.compose("  "), "type:ticket organization:7");
        assert!(TicketFilters::default().is_empty());
    }

    #[test]
    fn test_capability_flags_partition_the_enum() {
        let cached: Vec<_> = SearchType::ALL
            .iter()
            .filter(|t| t.session_cached())
            .collect();
        assert_eq!(
            cached,
            vec![
                &SearchType::Groups,
                &SearchType::SupportAddresses,
                &SearchType::Automations,
                &SearchType::CustomRoles,
                &SearchType::DynamicContent,
            ]
        );

        // No type is both server-filtered and session-cached
        for ty in SearchType::ALL {
            assert!(
                !(ty.supports_server_filter() && ty.session_cached()),
                "{:?} claims both capabilities",
                ty
            );
        }
    }

    #[test]
    fn test_empty_query_on_query_requiring_type_skips_network() {
        // The client points at a nonexistent instance; if dispatch issued a
        // request this would fail with a network error rather than Ok.
        let client = test_client();
        let cache = SessionCache::new();

        for ty in [
            SearchType::Users,
            SearchType::Organizations,
            SearchType::Triggers,
            SearchType::Macros,
            SearchType::Views,
        ] {
            let result = dispatch(&client, &cache, ty, "   ", None).unwrap();
            assert!(result.is_empty(), "{:?} should short-circuit", ty);
        }

        // Tickets with no text and no filters also short-circuits
        let result = dispatch(&client, &cache, SearchType::Tickets, "", None).unwrap();
        assert!(result.is_empty());
        let result = dispatch(
            &client,
            &cache,
            SearchType::Tickets,
            "",
            Some(&TicketFilters::default()),
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_by_name_is_case_insensitive_substring() {
        let items = vec![
            group_item(1, "Billing Escalations"),
            group_item(2, "Tier 1 Support"),
            group_item(3, "tier 2 support"),
        ];

        // Empty query returns the full collection
        assert_eq!(filter_by_name(&items, "").len(), 3);
        assert_eq!(filter_by_name(&items, "   ").len(), 3);

        let tiers = filter_by_name(&items, "TIER");
        assert_eq!(tiers.len(), 2);
        assert!(tiers.iter().all(|i| i.name().to_lowercase().contains("tier")));

        assert!(filter_by_name(&items, "payroll").is_empty());
    }

    #[test]
    fn test_parse_list_normalizes_envelopes() {
        let envelope: Value = serde_json::from_str(
            r#"{"groups": [{"id": 1, "name": "Support"}], "next_page": null, "count": 1}"#,
        )
        .unwrap();
        let groups: Vec<Group> = parse_list(&envelope, "groups").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Support");

        // Missing key normalizes to empty, not an error
        let empty: Vec<Group> = parse_list(&envelope, "results").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_search_item_accessors() {
        let ticket = SearchItem::Ticket(Ticket {
            id: 101,
            subject: Some("Printer on fire".to_string()),
            description: None,
            status: Some(TicketStatus::Open),
            priority: Some("high".to_string()),
            requester_id: None,
            assignee_id: None,
            group_id: None,
            organization_id: None,
            tags: vec![],
            created_at: None,
            updated_at: None,
        });
        assert_eq!(ticket.id(), 101);
        assert_eq!(ticket.name(), "Printer on fire");
        assert_eq!(ticket.description().as_deref(), Some("Open · high"));
        assert_eq!(ticket.search_type(), SearchType::Tickets);

        let bare = SearchItem::Ticket(Ticket {
            id: 102,
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
        assert_eq!(bare.name(), "(no subject)");
        assert_eq!(bare.description(), None);
    }

    #[test]
    fn test_fetch_collection_items_rejects_server_types() {
        let client = test_client();
        let err = fetch_collection_items(&client, SearchType::Users).unwrap_err();
        assert!(err.to_string().contains("server-side"));
    }
}
