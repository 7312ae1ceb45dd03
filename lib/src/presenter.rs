use crate::accumulator::AccumulatedState;
use crate::notification::{NotificationRecord, NotificationType};

const TIMESTAMP_LABEL: &str = "Time";
const RECIPIENT_LABEL: &str = "Recipient";
const SUBJECT_LABEL: &str = "Subject";
const SMTP_RESPONSE_LABEL: &str = "Response of SMTP";
const ACTION_LABEL: &str = "R(action)";
const REASON_LABEL: &str = "R(reason)";
const STATUS_LABEL: &str = "R(status)";
const DIAGNOSTIC_CODE_LABEL: &str = "R(diag. code)";

/// What to show while no record of the presented type has arrived yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyRendering {
    #[default]
    Skip,
    /// Header-only table, as the first version of the monitor did.
    Shell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_html(
        &self,
        node_id: &str,
        notification_type: NotificationType,
        table_class: &str,
    ) -> String {
        let mut html = String::new();

        html.push_str("<style>");
        html.push_str(&Style::css(node_id, notification_type));
        html.push_str("</style>");

        html.push_str(&format!("<span><table class=\"{}\">", escape_html(table_class)));
        html.push_str(&html_row(&self.headers, "th"));
        for row in &self.rows {
            html.push_str(&html_row(row, "td"));
        }
        html.push_str("</table></span>");

        html
    }
}

#[derive(Debug, Clone)]
pub struct Presenter {
    notification_type: NotificationType,
    empty_rendering: EmptyRendering,
}

impl Presenter {
    pub fn new(notification_type: NotificationType) -> Self {
        Self {
            notification_type,
            empty_rendering: EmptyRendering::default(),
        }
    }

    pub fn with_empty_rendering(
        self,
        empty_rendering: EmptyRendering,
    ) -> Self {
        Self { empty_rendering, ..self }
    }

    pub fn notification_type(&self) -> NotificationType {
        self.notification_type
    }

    /// `None` means nothing should be shown.
    pub fn render(
        &self,
        state: &AccumulatedState,
    ) -> Option<Table> {
        let table = Self::table(state, self.notification_type);

        match self.empty_rendering {
            EmptyRendering::Shell => Some(table),
            EmptyRendering::Skip if table.is_empty() => None,
            EmptyRendering::Skip => Some(table),
        }
    }

    /// Records of `notification_type`, most recent first. Equal timestamps are
    /// ordered by message id so repeated renders of one state are identical.
    pub fn table(
        state: &AccumulatedState,
        notification_type: NotificationType,
    ) -> Table {
        let mut entries = state
            .entries()
            .filter(|(_, record)| record.notification_type() == notification_type)
            .collect::<Vec<_>>();

        entries.sort_by(|(a_id, a), (b_id, b)| b.timestamp().cmp(a.timestamp()).then_with(|| a_id.cmp(b_id)));

        Table {
            headers: headers(notification_type),
            rows: entries.into_iter().map(|(_, record)| columns(record)).collect(),
        }
    }
}

fn headers(notification_type: NotificationType) -> Vec<String> {
    let mut headers = vec![TIMESTAMP_LABEL, RECIPIENT_LABEL, SUBJECT_LABEL];

    match notification_type {
        NotificationType::Delivery => headers.push(SMTP_RESPONSE_LABEL),
        NotificationType::Bounce => headers.extend([ACTION_LABEL, REASON_LABEL, STATUS_LABEL, DIAGNOSTIC_CODE_LABEL]),
    }

    headers.into_iter().map(String::from).collect()
}

fn columns(record: &NotificationRecord) -> Vec<String> {
    let mail = record.mail();
    let mut columns = vec![mail.timestamp.clone(), mail.to.clone(), mail.subject.clone()];

    match record {
        NotificationRecord::Delivery(delivery) => columns.push(delivery.smtp_response.clone().unwrap_or_default()),
        NotificationRecord::Bounce(bounce) => columns.extend([
            bounce.action.clone(),
            bounce.reason.clone(),
            bounce.status.clone(),
            bounce.diagnostic_code.clone(),
        ]),
    }

    columns
}

fn html_row(
    cells: &[String],
    kind: &str,
) -> String {
    let cells = cells
        .iter()
        .map(|cell| format!("<{kind}>{}</{kind}>", escape_html(cell).replace('\n', "<br>")))
        .collect::<String>();

    format!("<tr>{cells}</tr>")
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub struct Style;

impl Style {
    pub fn css(
        node_id: &str,
        notification_type: NotificationType,
    ) -> String {
        let (accent, background) = Self::colors(notification_type);

        format!(
            "#{node_id}{{margin-top:1em;margin-bottom:1em;}}\
             #{node_id} span{{background-color:ghostwhite;}}\
             #{node_id} table{{color:black;}}\
             #{node_id} table tr:nth-child(2n){{background-color:whitesmoke;color:black;}}\
             #{node_id} table th{{background-color:{accent};color:white;}}\
             #{node_id} table{{border:2px solid {accent};background-color:{background};}}"
        )
    }

    fn colors(notification_type: NotificationType) -> (&'static str, &'static str) {
        match notification_type {
            NotificationType::Delivery => ("darkgreen", "#00640055"),
            NotificationType::Bounce => ("firebrick", "#b2222255"),
        }
    }
}
