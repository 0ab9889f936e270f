use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container, Row,
    },
    Alignment, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Size, Subscription,
    Task, Theme,
};
use rs422core::comms::{ControlSwitches, LedColor, LedPanel, LinkReport, Switch};
use rs422core::ingest::DisplayRecord;
use rs422core::parameters::StatusClass;
use serde::Deserialize;
use std::{collections::BTreeMap, time::Duration};

const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:9000";
const MAX_TIME_TICKS: usize = 6;
const AXIS_HEIGHT: f32 = 18.0;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "RS422 Control & Debug Center".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(2)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

fn bridge_url(path: &str) -> String {
    let base = std::env::var("RS422_BRIDGE_URL").unwrap_or_else(|_| DEFAULT_BRIDGE_URL.into());
    format!("{}/{}", base.trim_end_matches('/'), path)
}

#[derive(Debug)]
struct Visualizer {
    switches: ControlSwitches,
    payload: Option<DashboardPayload>,
    selected: Option<String>,
    csv_path: String,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<DashboardPayload, String>),
    Toggle(Switch),
    SelectParameter(String),
    CsvPathChanged(String),
    UploadCsv,
    Simulate,
    Submitted(Result<String, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                switches: ControlSwitches::default(),
                payload: None,
                selected: None,
                csv_path: "data/sample_parameters.csv".into(),
                status: "Waiting for telemetry...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                let keep_selection = state
                    .selected
                    .as_ref()
                    .is_some_and(|name| payload.parameters.contains_key(name));
                if !keep_selection {
                    state.selected = payload.parameters.keys().next().cloned();
                }
                state.status = format!(
                    "Telemetry ({}): {} parameters",
                    payload.source,
                    payload.parameters.len()
                );
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Telemetry error: {err}");
                Task::none()
            }
            Message::Toggle(switch) => {
                state.switches.toggle(switch);
                state.push_history(format!(
                    "{} {}",
                    switch.label(),
                    if state.switches.is_on(switch) { "on" } else { "off" }
                ));
                Task::none()
            }
            Message::SelectParameter(name) => {
                state.selected = Some(name);
                Task::none()
            }
            Message::CsvPathChanged(value) => {
                state.csv_path = value;
                Task::none()
            }
            Message::UploadCsv => Task::perform(
                upload_csv(state.csv_path.clone()),
                Message::Submitted,
            ),
            Message::Simulate => Task::perform(post_simulate(), Message::Submitted),
            Message::Submitted(Ok(message)) => {
                state.status = message.clone();
                state.push_history(message);
                Task::perform(fetch_payload(), Message::PayloadFetched)
            }
            Message::Submitted(Err(err)) => {
                state.status = format!("Upload error: {err}");
                state.push_history("Upload rejected".into());
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let controls_column = column![
            text("System Controls").size(26),
            switch_panel(&state.switches),
            text("Status Indicators").size(20),
            led_grid(state.payload.as_ref(), &state.switches),
            text("Upload Parameter Data").size(20),
            text("CSV columns: Timestamp (YYYY-MM-DD HH:MM:SS), Parameter, Value").size(12),
            text_input("CSV file path", &state.csv_path)
                .on_input(Message::CsvPathChanged)
                .padding(6),
            row![
                button("Upload CSV").on_press(Message::UploadCsv).padding(10),
                button("Simulate").on_press(Message::Simulate).padding(10),
            ]
            .spacing(10),
            text(&state.status).size(14),
            text("Activity log").size(16),
            Container::new(scrollable(history_list(&state.history)).height(Length::Fixed(120.0)))
                .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(380.0));

        let telemetry_column = match &state.payload {
            Some(payload) => telemetry_view(payload, state.selected.as_deref()),
            None => column![text("RS422 Communication").size(26), text("No telemetry yet").size(14)]
                .spacing(10)
                .padding(16),
        }
        .width(Length::Fill);

        let layout = row![controls_column, telemetry_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn status_color(status: StatusClass) -> Color {
    let [r, g, b] = status.rgb();
    Color::from_rgb(r, g, b)
}

fn led_color(color: LedColor) -> Color {
    match color {
        LedColor::Green => status_color(StatusClass::Normal),
        LedColor::Yellow => status_color(StatusClass::Warning),
        LedColor::Red => status_color(StatusClass::Critical),
    }
}

fn switch_panel(switches: &ControlSwitches) -> Column<'static, Message> {
    let toggles = Switch::ALL
        .iter()
        .fold(Column::new().spacing(6), |col, &switch| {
            let on = switches.is_on(switch);
            let state_label = match (switch, on) {
                (Switch::MainPower, true) => "ONLINE",
                (Switch::MainPower, false) => "OFFLINE",
                (_, true) => "ACTIVE",
                (_, false) => "INACTIVE",
            };
            col.push(
                row![
                    button(text(switch.label()))
                        .on_press(Message::Toggle(switch))
                        .padding(8)
                        .width(Length::Fixed(140.0)),
                    text(state_label).size(16).color(if on {
                        status_color(StatusClass::Normal)
                    } else {
                        status_color(StatusClass::Inactive)
                    }),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            )
        });

    let banner = format!(
        "Communication: {}",
        switches.communication_status().label()
    );
    toggles.push(
        text(banner)
            .size(18)
            .color(status_color(switches.banner_status())),
    )
}

/// LEDs come from the bridge; POWER and RS422 follow the local toggles.
fn led_grid(payload: Option<&DashboardPayload>, switches: &ControlSwitches) -> Column<'static, Message> {
    let mut panel = payload
        .map(|payload| payload.leds.clone())
        .unwrap_or_default();
    panel.apply_switches(switches);

    panel
        .leds
        .chunks(4)
        .fold(Column::new().spacing(8), |col, chunk| {
            let cells = chunk.iter().fold(Row::new().spacing(8), |row, led| {
                row.push(
                    column![
                        text(format!("● {}", led.name))
                            .size(16)
                            .color(led_color(led.color)),
                        text(led.description.clone()).size(11),
                    ]
                    .spacing(2)
                    .width(Length::Fixed(86.0)),
                )
            });
            col.push(cells)
        })
}

fn history_list(history: &[String]) -> Column<'static, Message> {
    if history.is_empty() {
        Column::new().push(text("No activity yet").size(12))
    } else {
        history
            .iter()
            .rev()
            .fold(Column::new().spacing(4), |col, entry| {
                col.push(text(entry.clone()).size(12))
            })
    }
}

fn link_panel(link: &LinkReport) -> Column<'static, Message> {
    column![
        text("RS422 Communication").size(26),
        text(format!(
            "Data rate: {:.2} / {:.1} Mbit/s ({:.0}%) - {}",
            link.metrics.current_rate,
            link.max_rate,
            link.rate_percentage,
            link.grade.label()
        ))
        .size(16)
        .color(status_color(link.rate_status)),
        text(format!(
            "Valid messages: {}/{} ({:.1}%)",
            link.metrics.valid_messages, link.metrics.total_messages, link.success_rate
        ))
        .size(16)
        .color(status_color(link.success_status)),
    ]
    .spacing(6)
}

fn telemetry_view<'a>(payload: &'a DashboardPayload, selected: Option<&str>) -> Column<'a, Message> {
    let tabs = payload
        .parameters
        .values()
        .fold(Row::new().spacing(8), |tabs, record| {
            tabs.push(
                button(text(format!("{} {}", record.config.icon, record.config.name)))
                    .on_press(Message::SelectParameter(record.config.name.clone()))
                    .padding(8),
            )
        });

    let notes = payload
        .notes
        .iter()
        .fold(Column::new().spacing(4), |col, note| {
            col.push(text(note.clone()).size(12))
        });

    let detail = match selected.and_then(|name| payload.parameters.get(name)) {
        Some(record) => parameter_detail(record),
        None => Column::new().push(text("No parameter data available").size(14)),
    };

    column![
        link_panel(&payload.link),
        text("Physical Parameters").size(26),
        tabs,
        detail,
        notes,
    ]
    .spacing(10)
    .padding(16)
}

fn parameter_detail(record: &DisplayRecord) -> Column<'static, Message> {
    let config = &record.config;
    let status = record.current_status();
    let current = record
        .current_value()
        .map(|value| format!("{value:.1} {}", config.unit))
        .unwrap_or_else(|| "n/a".into());

    let stats = match record.stats() {
        Some(stats) => format!(
            "Average {:.2} {unit} | Min {:.2} {unit} | Max {:.2} {unit}",
            stats.mean,
            stats.min,
            stats.max,
            unit = config.unit
        ),
        None => "No samples".into(),
    };

    let chart = Canvas::new(SeriesChart::new(record))
        .width(Length::Fill)
        .height(Length::Fixed(280.0));

    column![
        text(format!("Current value: {current}")).size(22),
        text(status.label()).size(18).color(status_color(status)),
        text(format!(
            "Normal {} - {} {unit} | Warning {} - {} {unit} | Critical outside",
            config.normal_min,
            config.normal_max,
            config.warning_min,
            config.warning_max,
            unit = config.unit
        ))
        .size(12),
        chart,
        text(stats).size(14),
    ]
    .spacing(8)
}

async fn fetch_payload() -> Result<DashboardPayload, String> {
    let response = reqwest::get(bridge_url("payload"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<DashboardPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn upload_csv(path: String) -> Result<String, String> {
    let body = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| format!("{path}: {e}"))?;
    let client = reqwest::Client::new();
    let response = client
        .post(bridge_url("ingest"))
        .header("content-type", "text/csv")
        .body(body)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    submission_result(response, "Imported").await
}

async fn post_simulate() -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(bridge_url("simulate"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    submission_result(response, "Simulated").await
}

async fn submission_result(response: reqwest::Response, verb: &str) -> Result<String, String> {
    let status = response.status();
    let reply: BridgeReply = response.json().await.map_err(|e| e.to_string())?;
    if status.is_success() {
        Ok(format!("{verb} data for {} parameters", reply.parameters.len()))
    } else {
        Err(format!("{}: {}", status, reply.message.unwrap_or_default()))
    }
}

#[derive(Debug, Deserialize)]
struct BridgeReply {
    #[serde(default)]
    parameters: Vec<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DashboardPayload {
    #[serde(default)]
    source: String,
    #[serde(default)]
    parameters: BTreeMap<String, DisplayRecord>,
    #[serde(default)]
    link: LinkReport,
    #[serde(default)]
    leds: LedPanel,
    #[serde(default)]
    notes: Vec<String>,
}

#[derive(Clone)]
struct SeriesChart {
    values: Vec<f64>,
    time_labels: Vec<String>,
    statuses: Vec<StatusClass>,
    normal: (f64, f64),
    warning: (f64, f64),
}

impl SeriesChart {
    fn new(record: &DisplayRecord) -> Self {
        Self {
            values: record.values.clone(),
            time_labels: record.time_labels.clone(),
            statuses: record.point_statuses(),
            normal: (record.config.normal_min, record.config.normal_max),
            warning: (record.config.warning_min, record.config.warning_max),
        }
    }

    /// Indices of the time labels drawn on the x-axis: every nth label plus the last.
    fn tick_indices(&self) -> Vec<usize> {
        let count = self.time_labels.len();
        if count == 0 {
            return Vec::new();
        }
        let step = count.div_ceil(MAX_TIME_TICKS).max(1);
        let mut ticks: Vec<usize> = (0..count).step_by(step).collect();
        if ticks.last() != Some(&(count - 1)) {
            // keep the final label readable
            if ticks.len() > 1 && count - 1 - ticks[ticks.len() - 1] < step / 2 {
                ticks.pop();
            }
            ticks.push(count - 1);
        }
        ticks
    }
}

impl canvas::Program<Message> for SeriesChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        let low = self
            .values
            .iter()
            .copied()
            .fold(self.warning.0, f64::min);
        let high = self
            .values
            .iter()
            .copied()
            .fold(self.warning.1, f64::max);
        let span = (high - low).max(f64::EPSILON);
        let plot_height = (bounds.height - AXIS_HEIGHT).max(1.0);
        let to_y = |value: f64| plot_height - ((value - low) / span) as f32 * plot_height;

        let band_top = to_y(self.normal.1);
        frame.fill_rectangle(
            Point::new(0.0, band_top),
            Size::new(bounds.width, to_y(self.normal.0) - band_top),
            Color::from_rgba(0.16, 0.65, 0.27, 0.15),
        );

        let to_x = |index: usize| {
            if self.values.len() > 1 {
                index as f32 * bounds.width / (self.values.len() as f32 - 1.0)
            } else {
                bounds.width / 2.0
            }
        };

        if self.values.len() > 1 {
            let path = Path::new(|builder| {
                for (i, value) in self.values.iter().enumerate() {
                    let point = Point::new(to_x(i), to_y(*value));
                    if i == 0 {
                        builder.move_to(point);
                    } else {
                        builder.line_to(point);
                    }
                }
            });
            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::from_rgb(0.18, 0.72, 0.89)),
            );
        }

        for (i, (value, status)) in self.values.iter().zip(&self.statuses).enumerate() {
            let marker = Path::new(|builder| {
                builder.circle(Point::new(to_x(i), to_y(*value)), 4.0)
            });
            frame.fill(&marker, status_color(*status));
        }

        for index in self.tick_indices() {
            let label = &self.time_labels[index];
            let x = (to_x(index) - 14.0).clamp(0.0, (bounds.width - 30.0).max(0.0));
            frame.fill_text(canvas::Text {
                content: label.clone(),
                position: Point::new(x, plot_height + 3.0),
                color: Color::from_rgb(0.7, 0.7, 0.7),
                size: Pixels(11.0),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_tolerates_missing_sections() {
        let payload: DashboardPayload = serde_json::from_str(r#"{"source":"empty"}"#).unwrap();
        assert!(payload.parameters.is_empty());
        assert_eq!(payload.leds.leds.len(), 8);
        assert_eq!(payload.link, LinkReport::default());
    }

    #[test]
    fn chart_colours_points_by_status() {
        let json = r#"{
            "name": "Voltage", "unit": "V", "icon": "V",
            "normal_min": 4.8, "normal_max": 5.2,
            "warning_min": 4.5, "warning_max": 5.5,
            "mean": 5.0, "std_dev": 0.3,
            "values": [5.0, 4.6, 6.0],
            "time_labels": ["10:00", "10:01", "10:02"]
        }"#;
        let record: DisplayRecord = serde_json::from_str(json).unwrap();
        let chart = SeriesChart::new(&record);
        assert_eq!(
            chart.statuses,
            vec![StatusClass::Normal, StatusClass::Warning, StatusClass::Critical]
        );
        assert_eq!(chart.normal, (4.8, 5.2));
        assert_eq!(chart.time_labels, record.time_labels);
        assert_eq!(chart.tick_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn long_series_thins_time_ticks() {
        let values: Vec<f64> = (0..30).map(|i| 5.0 + i as f64 * 0.001).collect();
        let labels: Vec<String> = (0..30).map(|i| format!("11:{:02}", 30 + i)).collect();
        let json = serde_json::json!({
            "name": "Voltage", "unit": "V", "icon": "V",
            "normal_min": 4.8, "normal_max": 5.2,
            "warning_min": 4.5, "warning_max": 5.5,
            "mean": 5.0, "std_dev": 0.3,
            "values": values,
            "time_labels": labels,
        });
        let record: DisplayRecord = serde_json::from_value(json).unwrap();
        let chart = SeriesChart::new(&record);
        let ticks = chart.tick_indices();
        assert_eq!(ticks.first(), Some(&0));
        assert_eq!(ticks.last(), Some(&29));
        assert!(ticks.len() <= MAX_TIME_TICKS + 1);
        assert_eq!(chart.time_labels[ticks[0]], "11:30");
        assert_eq!(chart.time_labels[29], "11:59");
    }

    #[test]
    fn empty_series_has_no_ticks() {
        let json = r#"{
            "name": "Voltage", "unit": "V", "icon": "V",
            "normal_min": 4.8, "normal_max": 5.2,
            "warning_min": 4.5, "warning_max": 5.5,
            "mean": 5.0, "std_dev": 0.3,
            "values": [],
            "time_labels": []
        }"#;
        let record: DisplayRecord = serde_json::from_str(json).unwrap();
        assert!(SeriesChart::new(&record).tick_indices().is_empty());
    }
}
