//! Built-in prompt template catalog.
//!
//! Templates are read-only starting points for new steps: the title becomes
//! the step title, the suggested tool becomes the step's tab, and the body
//! becomes its instructions.

use crate::{Error, Result};

/// A static, predefined starting point for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub id: &'static str,
    pub category: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub suggested_tool: &'static str,
    pub body: &'static str,
}

const CATALOG: &[PromptTemplate] = &[
    PromptTemplate {
        id: "customer-handoff",
        category: "Support",
        title: "Customer escalation triage",
        description: "Collect context from email, gather CRM notes, and prepare a copilot handoff message.",
        suggested_tool: "Shared inbox + CRM",
        body: "You are helping with a customer escalation. Summarise the email thread, note the latest customer sentiment, and
list the last three CRM interactions. Prepare a suggested response that acknowledges each concern and proposes the next
step.",
    },
    PromptTemplate {
        id: "design-qa",
        category: "Product",
        title: "Design QA review",
        description: "Walk through new designs, capture bugs, and suggest fixes while hopping across tabs.",
        suggested_tool: "Figma + Linear",
        body: "Open the new Figma file and review the linked Jira or Linear ticket. List any visual or UX issues you notice. For
serious issues include a screenshot URL, the impacted component, and a suggested fix. Mention which stakeholders need a
follow-up.",
    },
    PromptTemplate {
        id: "campaign-launch",
        category: "Marketing",
        title: "Campaign launch double-check",
        description: "Verify assets, URLs, and analytics configuration before publishing.",
        suggested_tool: "Notion + Ads manager",
        body: "Open the launch checklist doc. Confirm creative assets are final, URLs resolve, UTMs match the campaign sheet, and
analytics dashboards are ready. Capture anything missing plus the exact tab or tool to fix it.",
    },
    PromptTemplate {
        id: "sales-followup",
        category: "Sales",
        title: "Sales follow-up prep",
        description: "Combine meeting notes, CRM signals, and AI guidance for a tight reply.",
        suggested_tool: "CRM + Email",
        body: "Review the meeting recording summary, highlight the top three buyer priorities, and list any open questions. Draft
an email that references those points and suggests a clear next step with a deadline.",
    },
];

/// All templates in display order.
pub fn all() -> &'static [PromptTemplate] {
    CATALOG
}

/// Look up a template by id.
pub fn find(id: &str) -> Option<&'static PromptTemplate> {
    CATALOG.iter().find(|t| t.id == id)
}

/// Like [`find`], but an unknown id is an error (CLI input).
pub fn require(id: &str) -> Result<&'static PromptTemplate> {
    find(id).ok_or_else(|| Error::TemplateNotFound(id.to_string()))
}
