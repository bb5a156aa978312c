//! Login, operator, and admin menu flows

use anyhow::Result;
use pmtrack_config::AppConfig;
use pmtrack_core::{CoreEvent, PolicyEngine};
use pmtrack_types::{Equipment, PM_STAGES, PmRecord, RetentionPeriod, StageKind, StageResults, Zone};
use pmtrack_util::{PmError, format_datetime_full, now};
use std::io::{BufRead, Write};
use tracing::warn;

use crate::console::{AlertKind, Console};
use crate::report;

const BROWSE_PAGE_SIZE: usize = 10;

/// Whether to keep serving menus or shut the application down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// The interactive shell. Owns the console for the whole run; the engine
/// and config are borrowed from the binary's setup code.
pub struct Shell<'a, R, W> {
    engine: &'a mut PolicyEngine,
    config: &'a AppConfig,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(engine: &'a mut PolicyEngine, config: &'a AppConfig, console: Console<R, W>) -> Self {
        Self { engine, config, console }
    }

    /// Recover the console, e.g. to inspect scripted output in tests.
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Top-level login loop. Returns when the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.login_screen()?;

            let Some(choice) = self.console.prompt("Enter your choice: ")? else {
                return Ok(());
            };

            let operator_count = self.config.operators.len();
            let admin_choice = operator_count + 1;
            let exit_choice = operator_count + 2;

            match choice.parse::<usize>() {
                Ok(n) if (1..=operator_count).contains(&n) => {
                    let user = self.config.operators[n - 1].clone();
                    self.console.alert(AlertKind::Success, format!("Welcome, {user}!"))?;
                    if self.operator_shell(&user)? == Flow::Exit {
                        return Ok(());
                    }
                }
                Ok(n) if n == admin_choice => {
                    if self.admin_login()? == Flow::Exit {
                        return Ok(());
                    }
                }
                Ok(n) if n == exit_choice => {
                    self.console.line("Exiting application. Goodbye!")?;
                    return Ok(());
                }
                _ => {
                    self.console
                        .alert(AlertKind::Error, "Invalid choice. Please try again.")?;
                }
            }
        }
    }

    fn login_screen(&mut self) -> Result<()> {
        self.console.rule()?;
        self.console.line("     Factory PM Maintenance System     ")?;
        self.console.rule()?;
        self.console.line("\n--- User Login ---")?;
        for (i, name) in self.config.operators.iter().enumerate() {
            self.console.line(format!("{}. {}", i + 1, name))?;
        }
        self.console.line("\n--- Admin Access ---")?;
        self.console
            .line(format!("{}. Admin Login", self.config.operators.len() + 1))?;
        self.console
            .line(format!("{}. Exit", self.config.operators.len() + 2))?;
        self.console.rule()?;
        Ok(())
    }

    fn admin_login(&mut self) -> Result<Flow> {
        if self.config.site.admin_password.is_empty() {
            self.console
                .alert(AlertKind::Error, "Admin login is not configured.")?;
            return Ok(Flow::Continue);
        }

        let Some(password) = self.console.prompt("Enter Admin Password: ")? else {
            return Ok(Flow::Exit);
        };

        if password != self.config.site.admin_password {
            warn!("Failed admin login attempt");
            self.console.alert(AlertKind::Error, "Incorrect Admin Password!")?;
            return Ok(Flow::Continue);
        }

        self.console.alert(AlertKind::Success, "Admin Login Successful!")?;
        self.admin_shell()
    }

    fn logout(&mut self) -> Result<()> {
        self.engine.clear_sessions();
        self.console.alert(AlertKind::Info, "Logged out successfully.")?;
        Ok(())
    }

    // --- Operator flows ---

    fn operator_shell(&mut self, user: &str) -> Result<Flow> {
        loop {
            self.console.rule()?;
            self.console.line(format!("     Welcome, {user}     "))?;
            self.console.rule()?;

            self.console.line("\n--- Current PM Activities ---")?;
            let sessions = self.engine.active_sessions();
            if sessions.is_empty() {
                self.console.line("No active PM work at the moment.")?;
            }
            for session in &sessions {
                self.console.line(format!(
                    "- TAG: {} | Desc: {} | User: {} | Time: {}",
                    session.tag,
                    session.description,
                    session.user,
                    format_datetime_full(&session.started_at)
                ))?;
            }

            self.console.line("\n--- Zone Selection ---")?;
            for (i, zone) in Zone::ALL.iter().enumerate() {
                self.console.line(format!(
                    "{}. {} Zone ({} equipments)",
                    i + 1,
                    zone,
                    self.engine.catalog().count(*zone)
                ))?;
            }
            self.console.line("\n4. Logout")?;
            self.console.rule()?;

            let Some(choice) = self.console.prompt("Enter your choice: ")? else {
                return Ok(Flow::Exit);
            };

            match choice.as_str() {
                "1" => {
                    if self.zone_flow(user, Zone::Hlp)? == Flow::Exit {
                        return Ok(Flow::Exit);
                    }
                }
                "2" => {
                    if self.zone_flow(user, Zone::Screen)? == Flow::Exit {
                        return Ok(Flow::Exit);
                    }
                }
                "3" => {
                    if self.zone_flow(user, Zone::Compaction)? == Flow::Exit {
                        return Ok(Flow::Exit);
                    }
                }
                "4" => {
                    self.logout()?;
                    return Ok(Flow::Continue);
                }
                _ => {
                    self.console
                        .alert(AlertKind::Error, "Invalid choice. Please try again.")?;
                }
            }
        }
    }

    fn zone_flow(&mut self, user: &str, zone: Zone) -> Result<Flow> {
        if self.engine.catalog().count(zone) == 0 {
            self.console.alert(
                AlertKind::Error,
                format!("No equipment data found for {zone} zone. Please check CSV files."),
            )?;
            self.console.pause()?;
            return Ok(Flow::Continue);
        }

        loop {
            self.console.rule()?;
            self.console.line(format!("     PM Work - {zone} Zone     "))?;
            self.console.rule()?;
            self.console.line("\nSelect Equipment:")?;
            self.console.line("1. Type TAG Number")?;
            self.console.line("2. Browse Equipment List")?;
            self.console.line("3. Back to Main Menu")?;

            let Some(choice) = self.console.prompt("Enter your choice: ")? else {
                return Ok(Flow::Exit);
            };

            let equipment = match choice.as_str() {
                "1" => {
                    let Some(tag) = self.console.prompt("Enter TAG Number: ")? else {
                        return Ok(Flow::Exit);
                    };
                    match self.engine.catalog().find(zone, &tag.as_str().into()) {
                        Some(equipment) => equipment.clone(),
                        None => {
                            self.console
                                .alert(AlertKind::Error, "TAG Number not found. Please try again.")?;
                            self.console.pause()?;
                            continue;
                        }
                    }
                }
                "2" => match self.browse_equipment(zone)? {
                    Browse::Selected(equipment) => equipment,
                    Browse::Back => continue,
                    Browse::InputEnded => return Ok(Flow::Exit),
                },
                "3" => return Ok(Flow::Continue),
                _ => {
                    self.console
                        .alert(AlertKind::Error, "Invalid choice. Please try again.")?;
                    continue;
                }
            };

            return self.run_inspection(user, zone, equipment);
        }
    }

    fn browse_equipment(&mut self, zone: Zone) -> Result<Browse> {
        let equipment: Vec<Equipment> = self.engine.catalog().list(zone).to_vec();
        let num_pages = equipment.len().div_ceil(BROWSE_PAGE_SIZE);
        let mut page = 0;

        loop {
            self.console.rule()?;
            self.console.line(format!(
                "     Equipment List - {} Zone (Page {}/{})     ",
                zone,
                page + 1,
                num_pages
            ))?;
            self.console.rule()?;

            let start = page * BROWSE_PAGE_SIZE;
            let end = (start + BROWSE_PAGE_SIZE).min(equipment.len());
            for (i, eq) in equipment[start..end].iter().enumerate() {
                self.console
                    .line(format!("{}. {} - {}", start + i + 1, eq.tag, eq.description))?;
            }

            self.console.line("\n--- Navigation ---")?;
            if page > 0 {
                self.console.line("P. Previous Page")?;
            }
            if page + 1 < num_pages {
                self.console.line("N. Next Page")?;
            }
            self.console.line("0. Back to previous menu")?;

            let Some(choice) = self
                .console
                .prompt("Enter number to select equipment, 'P'/'N' for pages, or '0' to go back: ")?
            else {
                return Ok(Browse::InputEnded);
            };

            match choice.to_ascii_uppercase().as_str() {
                "0" => return Ok(Browse::Back),
                "P" if page > 0 => page -= 1,
                "N" if page + 1 < num_pages => page += 1,
                other => match other.parse::<usize>() {
                    Ok(n) if (1..=equipment.len()).contains(&n) => {
                        return Ok(Browse::Selected(equipment[n - 1].clone()));
                    }
                    _ => {
                        self.console.alert(
                            AlertKind::Error,
                            "Invalid input. Please enter a number or 'P'/'N'.",
                        )?;
                    }
                },
            }
        }
    }

    fn run_inspection(&mut self, user: &str, zone: Zone, equipment: Equipment) -> Result<Flow> {
        let started = now();

        if self.engine.check_repeat_warning(user, &equipment.tag, started) {
            self.console.alert(
                AlertKind::Warning,
                format!(
                    "Warning: You performed PM on {} less than {} hours ago!",
                    equipment.tag,
                    self.engine.settings().warning_period_hours
                ),
            )?;
            let Some(answer) = self.console.prompt("Proceed anyway? (yes/no): ")? else {
                return Ok(Flow::Exit);
            };
            if !answer.eq_ignore_ascii_case("yes") {
                self.console
                    .alert(AlertKind::Info, "PM work cancelled. No record saved.")?;
                return Ok(Flow::Continue);
            }
        }

        let session_id = match self.engine.begin_session(user, zone, &equipment.tag, started) {
            Ok(id) => id,
            Err(e) => {
                self.console.alert(AlertKind::Error, e.to_string())?;
                return Ok(Flow::Continue);
            }
        };

        self.console.rule()?;
        self.console
            .line(format!("     Performing PM on: {}     ", equipment.tag))?;
        self.console
            .line(format!("     Description: {}     ", equipment.description))?;
        self.console.rule()?;

        let mut results = StageResults::new();
        for (i, stage) in PM_STAGES.iter().enumerate() {
            self.console
                .line(format!("\n--- Stage {}: {} ---", i + 1, stage.name))?;
            match stage.kind {
                StageKind::Choice { options } => loop {
                    self.console.line(format!("Options: {}", options.join(", ")))?;
                    let Some(answer) = self.console.prompt("Enter your choice: ")? else {
                        self.engine.cancel_session(session_id)?;
                        return Ok(Flow::Exit);
                    };
                    if options.contains(&answer.as_str()) {
                        results.insert(stage.name, answer);
                        break;
                    }
                    self.console.alert(
                        AlertKind::Error,
                        "Invalid choice. Please enter one of the specified options.",
                    )?;
                },
                StageKind::Text => {
                    let Some(answer) = self.console.prompt("Enter notes/extra information: ")?
                    else {
                        self.engine.cancel_session(session_id)?;
                        return Ok(Flow::Exit);
                    };
                    results.insert(stage.name, answer);
                }
            }
        }

        self.console.line("\n--- PM Summary ---")?;
        for (stage, value) in results.ordered() {
            self.console
                .line(format!("{}: {}", stage, value.unwrap_or("")))?;
        }

        let Some(confirm) = self.console.prompt(
            "\nPM work complete? Type 'yes' to confirm and save, or anything else to cancel: ",
        )?
        else {
            self.engine.cancel_session(session_id)?;
            return Ok(Flow::Exit);
        };

        if confirm.eq_ignore_ascii_case("yes") {
            match self.engine.complete_session(session_id, results, now()) {
                Ok(_) => {
                    self.console.alert(
                        AlertKind::Success,
                        "PM work finished and recorded successfully!",
                    )?;
                }
                Err(PmError::StorageUnavailable(e)) => {
                    self.console.alert(
                        AlertKind::Warning,
                        format!("PM recorded, but saving to disk failed: {e}"),
                    )?;
                }
                Err(e) => {
                    self.console.alert(AlertKind::Error, e.to_string())?;
                }
            }
        } else {
            self.engine.cancel_session(session_id)?;
            self.console
                .alert(AlertKind::Info, "PM work cancelled. No record saved.")?;
        }

        self.console.pause()?;
        Ok(Flow::Continue)
    }

    // --- Admin flows ---

    fn admin_shell(&mut self) -> Result<Flow> {
        loop {
            self.console.rule()?;
            self.console.line("     Admin Dashboard     ")?;
            self.console.rule()?;
            self.console.line("\n1. History")?;
            self.console.line("2. Real-time Monitoring")?;
            self.console.line("3. Reports")?;
            self.console.line("4. Settings")?;
            self.console.line("5. Logout")?;
            self.console.rule()?;

            let Some(choice) = self.console.prompt("Enter your choice: ")? else {
                return Ok(Flow::Exit);
            };

            match choice.as_str() {
                "1" => self.show_history()?,
                "2" => self.show_monitoring()?,
                "3" => {
                    if self.reports_menu()? == Flow::Exit {
                        return Ok(Flow::Exit);
                    }
                }
                "4" => {
                    if self.settings_menu()? == Flow::Exit {
                        return Ok(Flow::Exit);
                    }
                }
                "5" => {
                    self.logout()?;
                    return Ok(Flow::Continue);
                }
                _ => {
                    self.console
                        .alert(AlertKind::Error, "Invalid choice. Please try again.")?;
                }
            }
        }
    }

    fn print_record(&mut self, record: &PmRecord) -> Result<()> {
        self.console
            .line(format!("\nDate/Time: {}", format_datetime_full(&record.timestamp)))?;
        self.console.line(format!("User: {}", record.user))?;
        self.console.line(format!("Zone: {}", record.zone))?;
        self.console.line(format!("TAG: {}", record.tag))?;
        self.console.line(format!("Description: {}", record.description))?;
        self.console.line("PM Data:")?;
        for (stage, value) in record.results.ordered() {
            self.console
                .line(format!("  - {}: {}", stage, value.unwrap_or("N/A")))?;
        }
        self.console.line("---------------------------------------")?;
        Ok(())
    }

    fn show_history(&mut self) -> Result<()> {
        self.console.rule()?;
        self.console.line("         PM History (Current Week)     ")?;
        self.console.rule()?;

        let history: Vec<PmRecord> = self.engine.history().into_iter().cloned().collect();
        if history.is_empty() {
            self.console.line("No PM history available for the current week.")?;
        }
        for record in &history {
            self.print_record(record)?;
        }

        self.console.pause()?;
        Ok(())
    }

    fn show_monitoring(&mut self) -> Result<()> {
        self.console.rule()?;
        self.console.line("     Real-time PM Activities     ")?;
        self.console.rule()?;

        let sessions = self.engine.active_sessions();
        if sessions.is_empty() {
            self.console.line("No active PM work at the moment.")?;
        }
        for session in &sessions {
            self.console.line(format!(
                "- TAG: {} | Desc: {} | User: {} | Status: In Progress | Time: {}",
                session.tag,
                session.description,
                session.user,
                format_datetime_full(&session.started_at)
            ))?;
        }

        let events = self.engine.drain_events();
        if !events.is_empty() {
            self.console.line("\n--- Recent Activity ---")?;
            for event in &events {
                self.console.line(format!("- {}", describe_event(event)))?;
            }
        }

        self.console.pause()?;
        Ok(())
    }

    fn reports_menu(&mut self) -> Result<Flow> {
        self.console.rule()?;
        self.console.line("            Weekly Reports             ")?;
        self.console.rule()?;
        self.console.line("\n1. Export to CSV")?;
        self.console.line("2. Export to Text")?;
        self.console.line("3. Email Report (Simulated)")?;
        self.console.line("4. Back to Admin Menu")?;

        let Some(choice) = self.console.prompt("Enter your choice: ")? else {
            return Ok(Flow::Exit);
        };

        if matches!(choice.as_str(), "1" | "2" | "3") && self.engine.records().is_empty() {
            self.console.alert(AlertKind::Info, "No data to export.")?;
            self.console.pause()?;
            return Ok(Flow::Continue);
        }

        let output_dir = &self.config.report.output_dir;
        if matches!(choice.as_str(), "1" | "2" | "3") {
            std::fs::create_dir_all(output_dir)?;
        }

        match choice.as_str() {
            "1" => match report::export_csv(self.engine.records(), output_dir, now()) {
                Ok(path) => self.console.alert(
                    AlertKind::Success,
                    format!("Report exported to {}", path.display()),
                )?,
                Err(e) => self
                    .console
                    .alert(AlertKind::Error, format!("Error exporting report: {e:#}"))?,
            },
            "2" => match report::export_text(self.engine.records(), output_dir, now()) {
                Ok(path) => self.console.alert(
                    AlertKind::Success,
                    format!("Report exported to {}", path.display()),
                )?,
                Err(e) => self
                    .console
                    .alert(AlertKind::Error, format!("Error exporting report: {e:#}"))?,
            },
            "3" => {
                let Some(address) = self.config.report.email.as_deref() else {
                    self.console
                        .alert(AlertKind::Error, "No report email address configured.")?;
                    self.console.pause()?;
                    return Ok(Flow::Continue);
                };
                match report::email_report(self.engine.records(), output_dir, address, now()) {
                    Ok(_) => {
                        self.console.alert(
                            AlertKind::Info,
                            format!("Simulating email of report to {address}"),
                        )?;
                        self.console
                            .alert(AlertKind::Success, "Email sent (simulated successfully).")?;
                    }
                    Err(e) => self
                        .console
                        .alert(AlertKind::Error, format!("Error emailing report: {e:#}"))?,
                }
            }
            "4" => return Ok(Flow::Continue),
            _ => {
                self.console.alert(AlertKind::Error, "Invalid choice.")?;
            }
        }

        self.console.pause()?;
        Ok(Flow::Continue)
    }

    fn settings_menu(&mut self) -> Result<Flow> {
        self.console.rule()?;
        self.console.line("            System Settings            ")?;
        self.console.rule()?;
        self.console.line(format!(
            "Current Data Reset Period: {}",
            self.engine.settings().retention
        ))?;
        self.console.line(format!(
            "Current Warning Period: {} hours",
            self.engine.settings().warning_period_hours
        ))?;
        self.console.line("\n1. Change Data Reset Period")?;
        self.console.line("2. Change Warning Period (hours)")?;
        self.console.line("3. Back to Admin Menu")?;

        let Some(choice) = self.console.prompt("Enter your choice: ")? else {
            return Ok(Flow::Exit);
        };

        match choice.as_str() {
            "1" => {
                self.console.line("\nSelect new reset period:")?;
                self.console.line("  1. Hourly (stored only)")?;
                self.console.line("  2. Daily (stored only)")?;
                self.console.line("  3. Weekly")?;
                self.console.line("  4. Monthly (stored only)")?;

                let Some(period_choice) = self.console.prompt("Enter choice (1-4): ")? else {
                    return Ok(Flow::Exit);
                };
                let period = match period_choice.as_str() {
                    "1" => Some(RetentionPeriod::Hourly),
                    "2" => Some(RetentionPeriod::Daily),
                    "3" => Some(RetentionPeriod::Weekly),
                    "4" => Some(RetentionPeriod::Monthly),
                    _ => None,
                };
                match period {
                    Some(period) => match self.engine.update_retention_period(period) {
                        Ok(()) => self.console.alert(
                            AlertKind::Success,
                            format!(
                                "Data reset period updated to: {period}. \
                                 (Only weekly auto-clear on startup is enforced)"
                            ),
                        )?,
                        Err(e) => self.console.alert(AlertKind::Error, e.to_string())?,
                    },
                    None => self.console.alert(AlertKind::Error, "Invalid choice.")?,
                }
            }
            "2" => {
                let Some(input) = self
                    .console
                    .prompt("Enter new warning period in hours (e.g., 24): ")?
                else {
                    return Ok(Flow::Exit);
                };
                match input.parse::<u32>() {
                    Ok(hours) => match self.engine.update_warning_period(hours) {
                        Ok(()) => self.console.alert(
                            AlertKind::Success,
                            format!("Warning period updated to: {hours} hours"),
                        )?,
                        Err(e) => self.console.alert(AlertKind::Error, e.to_string())?,
                    },
                    Err(_) => {
                        self.console.alert(
                            AlertKind::Error,
                            "Invalid input for warning period. Please enter a number.",
                        )?;
                    }
                }
            }
            "3" => return Ok(Flow::Continue),
            _ => {
                self.console.alert(AlertKind::Error, "Invalid choice.")?;
            }
        }

        self.console.pause()?;
        Ok(Flow::Continue)
    }
}

/// Result of the equipment browse screen
enum Browse {
    Selected(Equipment),
    Back,
    InputEnded,
}

fn describe_event(event: &CoreEvent) -> String {
    match event {
        CoreEvent::SessionStarted { user, tag, .. } => {
            format!("{user} started PM on {tag}")
        }
        CoreEvent::RecordConfirmed { user, tag, timestamp, .. } => {
            format!("{user} recorded PM on {tag} at {}", format_datetime_full(timestamp))
        }
        CoreEvent::SessionDiscarded { tag, .. } => {
            format!("PM on {tag} was cancelled")
        }
        CoreEvent::RetentionApplied { boundary, dropped } => {
            format!("{dropped} record(s) before {boundary} cleared")
        }
        CoreEvent::SettingsChanged { retention, warning_period_hours } => {
            format!("Settings changed: {retention} reset, {warning_period_hours}h warning")
        }
    }
}
