//! Mutually exclusive UI groups
//!
//! Tabs, grade filters, subject filters and accordion items all follow the
//! same rule: activating one member first clears the `active` class from
//! every sibling. Each group is a row in a [`GroupRegistry`] whose members
//! implement [`Activatable`]; clicks are dispatched by looking up which
//! group a control belongs to rather than by per-button handlers.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::host::{ElementId, HostDocument};

/// Class marking the selected member of a group
pub const ACTIVE_CLASS: &str = "active";

/// The selectable groups on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKind {
    /// Main section tabs
    Tab,
    /// Grade filter buttons
    Grade,
    /// Subject selector buttons
    Subject,
    /// Collapsible FAQ items
    Accordion,
}

impl GroupKind {
    /// All kinds in wiring order
    pub const ALL: [Self; 4] = [Self::Tab, Self::Grade, Self::Subject, Self::Accordion];

    /// Class of the clickable control
    #[must_use]
    pub const fn control_class(self) -> &'static str {
        match self {
            Self::Tab => "tab-btn",
            Self::Grade => "grade-btn",
            Self::Subject => "subject-btn",
            Self::Accordion => "accordion-header",
        }
    }

    /// Class of the panels the group shows and hides
    #[must_use]
    pub const fn panel_class(self) -> &'static str {
        match self {
            Self::Tab => "tab-content",
            Self::Grade => "grade-content",
            Self::Subject => "subject-content",
            Self::Accordion => "accordion-item",
        }
    }

    /// Attribute on the control naming its panel
    #[must_use]
    pub const fn key_attr(self) -> Option<&'static str> {
        match self {
            Self::Tab => Some("data-tab"),
            Self::Grade => Some("data-grade"),
            Self::Subject => Some("data-subject"),
            Self::Accordion => None,
        }
    }

    /// How a click changes the selection
    #[must_use]
    pub const fn policy(self) -> SelectionPolicy {
        match self {
            Self::Accordion => SelectionPolicy::Toggle,
            _ => SelectionPolicy::Exclusive,
        }
    }

    /// Whether newly shown panels re-arm their reveal animations
    #[must_use]
    pub const fn rearms_reveals(self) -> bool {
        matches!(self, Self::Tab | Self::Subject)
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tab => "tab",
            Self::Grade => "grade",
            Self::Subject => "subject",
            Self::Accordion => "accordion",
        };
        f.write_str(name)
    }
}

/// Selection rule of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Clicking selects the member; exactly one stays active
    Exclusive,
    /// Clicking an active member closes it; at most one is active
    Toggle,
}

/// Capability set of a group member
pub trait Activatable: fmt::Debug {
    /// Identifier the member is known by (`data-tab` value and so on)
    fn key(&self) -> &str;

    /// Element that receives clicks
    fn control(&self) -> ElementId;

    /// Panel revealed by this member, when it exists
    fn panel(&self) -> Option<ElementId>;

    /// Whether the member is currently selected
    fn is_active(&self, doc: &dyn HostDocument) -> bool;

    /// Marks the member selected
    fn activate(&self, doc: &mut dyn HostDocument);

    /// Clears the member's selection
    fn deactivate(&self, doc: &mut dyn HostDocument);
}

/// Button plus the panel it controls (tabs, grades, subjects)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelMember {
    key: String,
    control: ElementId,
    panel: Option<ElementId>,
}

impl PanelMember {
    /// Creates a member
    #[must_use]
    pub fn new(key: impl Into<String>, control: ElementId, panel: Option<ElementId>) -> Self {
        Self {
            key: key.into(),
            control,
            panel,
        }
    }
}

impl Activatable for PanelMember {
    fn key(&self) -> &str {
        &self.key
    }

    fn control(&self) -> ElementId {
        self.control
    }

    fn panel(&self) -> Option<ElementId> {
        self.panel
    }

    fn is_active(&self, doc: &dyn HostDocument) -> bool {
        doc.has_class(self.control, ACTIVE_CLASS)
    }

    fn activate(&self, doc: &mut dyn HostDocument) {
        doc.add_class(self.control, ACTIVE_CLASS);
        if let Some(panel) = self.panel {
            doc.add_class(panel, ACTIVE_CLASS);
        }
    }

    fn deactivate(&self, doc: &mut dyn HostDocument) {
        doc.remove_class(self.control, ACTIVE_CLASS);
        if let Some(panel) = self.panel {
            doc.remove_class(panel, ACTIVE_CLASS);
        }
    }
}

/// Accordion header and the item wrapping it; the item carries `active`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionMember {
    key: String,
    header: ElementId,
    item: ElementId,
}

impl AccordionMember {
    /// Creates a member
    #[must_use]
    pub fn new(header: ElementId, item: ElementId) -> Self {
        Self {
            key: item.to_string(),
            header,
            item,
        }
    }
}

impl Activatable for AccordionMember {
    fn key(&self) -> &str {
        &self.key
    }

    fn control(&self) -> ElementId {
        self.header
    }

    fn panel(&self) -> Option<ElementId> {
        Some(self.item)
    }

    fn is_active(&self, doc: &dyn HostDocument) -> bool {
        doc.has_class(self.item, ACTIVE_CLASS)
    }

    fn activate(&self, doc: &mut dyn HostDocument) {
        doc.add_class(self.item, ACTIVE_CLASS);
    }

    fn deactivate(&self, doc: &mut dyn HostDocument) {
        doc.remove_class(self.item, ACTIVE_CLASS);
    }
}

/// Result of a group click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Group that handled the click
    pub kind: GroupKind,
    /// Member index within the group
    pub index: usize,
    /// Member key
    pub key: String,
    /// Member panel, if it exists
    pub panel: Option<ElementId>,
    /// Whether the member ended up active (false when an accordion closed)
    pub active: bool,
}

/// One mutually exclusive group
#[derive(Debug)]
pub struct Group {
    kind: GroupKind,
    policy: SelectionPolicy,
    members: Vec<Box<dyn Activatable>>,
    /// Panels cleared on every selection, including ones no member owns
    panels: Vec<ElementId>,
}

impl Group {
    /// Creates an empty group with the kind's default policy
    #[must_use]
    pub fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            policy: kind.policy(),
            members: Vec::new(),
            panels: Vec::new(),
        }
    }

    /// Builds the group for `kind` from the elements present in `doc`
    #[must_use]
    pub fn discover(kind: GroupKind, doc: &dyn HostDocument) -> Self {
        let mut group = Self::new(kind);
        group.panels = doc.query_classes(&[kind.panel_class()]);
        for control in doc.query_classes(&[kind.control_class()]) {
            match kind.key_attr() {
                Some(attr) => {
                    let key = doc.attribute(control, attr).unwrap_or_default();
                    let panel = find_panel(doc, kind, &key);
                    group.push(Box::new(PanelMember::new(key, control, panel)));
                }
                None => {
                    if let Some(item) = doc.parent(control) {
                        group.push(Box::new(AccordionMember::new(control, item)));
                    }
                }
            }
        }
        group
    }

    /// Adds a member
    pub fn push(&mut self, member: Box<dyn Activatable>) {
        self.members.push(member);
    }

    /// Group kind
    #[must_use]
    pub const fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Selection policy
    #[must_use]
    pub const fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Members in document order
    #[must_use]
    pub fn members(&self) -> &[Box<dyn Activatable>] {
        &self.members
    }

    /// Number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Index of the member with `key`
    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.members.iter().position(|m| m.key() == key)
    }

    /// Number of members currently active
    #[must_use]
    pub fn active_count(&self, doc: &dyn HostDocument) -> usize {
        self.members.iter().filter(|m| m.is_active(doc)).count()
    }

    /// Index of the first active member
    #[must_use]
    pub fn active_index(&self, doc: &dyn HostDocument) -> Option<usize> {
        self.members.iter().position(|m| m.is_active(doc))
    }

    /// Applies a click on member `index`
    pub fn select(&self, doc: &mut dyn HostDocument, index: usize) -> Option<Selection> {
        let member = self.members.get(index)?;
        let was_active = member.is_active(doc);
        for other in &self.members {
            other.deactivate(doc);
        }
        for &panel in &self.panels {
            doc.remove_class(panel, ACTIVE_CLASS);
        }
        let active = match self.policy {
            SelectionPolicy::Exclusive => true,
            SelectionPolicy::Toggle => !was_active,
        };
        if active {
            member.activate(doc);
        }
        debug!(group = %self.kind, key = member.key(), active, "group selection");
        Some(Selection {
            kind: self.kind,
            index,
            key: member.key().to_string(),
            panel: member.panel(),
            active,
        })
    }
}

fn find_panel(doc: &dyn HostDocument, kind: GroupKind, key: &str) -> Option<ElementId> {
    if key.is_empty() {
        return None;
    }
    match kind {
        GroupKind::Subject => doc.query_class_with_attr(kind.panel_class(), "data-subject", key),
        _ => doc.element_by_id(key),
    }
}

/// Registration table from group identity to members
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: HashMap<GroupKind, Group>,
    controls: HashMap<ElementId, (GroupKind, usize)>,
}

impl GroupRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discovers every group kind present in `doc`
    #[must_use]
    pub fn discover(doc: &dyn HostDocument) -> Self {
        let mut registry = Self::new();
        for kind in GroupKind::ALL {
            let group = Group::discover(kind, doc);
            if !group.is_empty() {
                registry.register(group);
            }
        }
        registry
    }

    /// Adds or replaces a group
    pub fn register(&mut self, group: Group) {
        let kind = group.kind();
        self.controls.retain(|_, (k, _)| *k != kind);
        for (index, member) in group.members().iter().enumerate() {
            self.controls.insert(member.control(), (kind, index));
        }
        self.groups.insert(kind, group);
    }

    /// Group of `kind`
    #[must_use]
    pub fn group(&self, kind: GroupKind) -> Option<&Group> {
        self.groups.get(&kind)
    }

    /// Group and member index a control belongs to
    #[must_use]
    pub fn resolve(&self, control: ElementId) -> Option<(GroupKind, usize)> {
        self.controls.get(&control).copied()
    }

    /// Handles a click on `control`; `None` when it is not a group control
    pub fn activate_control(
        &self,
        doc: &mut dyn HostDocument,
        control: ElementId,
    ) -> Option<Selection> {
        let (kind, index) = self.resolve(control)?;
        self.groups.get(&kind)?.select(doc, index)
    }

    /// Selects the member of `kind` whose key is `key`
    pub fn activate_key(
        &self,
        doc: &mut dyn HostDocument,
        kind: GroupKind,
        key: &str,
    ) -> Option<Selection> {
        let group = self.groups.get(&kind)?;
        let index = group.position(key)?;
        group.select(doc, index)
    }

    /// Whether every group is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Drops all groups
    pub fn clear(&mut self) {
        self.groups.clear();
        self.controls.clear();
    }
}
