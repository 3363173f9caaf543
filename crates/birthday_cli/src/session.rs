//! Interactive menus over a [`RecordStore`].
//!
//! The session only collects input and renders results. Every rule about
//! records and avatar usage lives in `birthday_core`; rejected input is shown
//! to the operator and asked again.

use crate::console::{parse_choice, Console};
use anyhow::Result;
use birthday_core::model::record::{normalize_birthday, normalize_name};
use birthday_core::{BirthdayRecord, EditOutcome, RecordField, RecordStore, StoreError};
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;

enum AvatarPick {
    Keep,
    Set(String),
}

pub struct Session<R, W> {
    store: RecordStore,
    records_path: PathBuf,
    images_dir: PathBuf,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        store: RecordStore,
        records_path: PathBuf,
        images_dir: PathBuf,
        console: Console<R, W>,
    ) -> Self {
        Self {
            store,
            records_path,
            images_dir,
            console,
        }
    }

    /// Runs the main menu until the operator exits.
    pub fn run(&mut self) -> Result<()> {
        info!(
            "event=session_start module=cli status=ok records={}",
            self.store.len()
        );
        loop {
            self.print_banner()?;
            match self.console.ask("Choose an action (1-5): ")?.as_str() {
                "1" => self.modify_menu()?,
                "2" => self.rewrite_all()?,
                "3" => {
                    self.show_records()?;
                    self.console.ask("Press Enter to return...")?;
                }
                "4" => {
                    self.show_unused()?;
                    self.console.ask("Press Enter to return...")?;
                }
                "5" => {
                    if self.store.has_unsaved_changes()
                        && self.console.agree("Save changes before exiting? (y/n): ")?
                    {
                        self.save()?;
                    }
                    self.console.say("Goodbye!")?;
                    info!("event=session_end module=cli status=ok");
                    return Ok(());
                }
                _ => self.console.say("Invalid choice, try again.")?,
            }
        }
    }

    fn print_banner(&mut self) -> Result<()> {
        let rule = "=".repeat(40);
        self.console.say("")?;
        self.console.say(&rule)?;
        self.console.say("      Birthday Keeper data tool")?;
        self.console.say(&rule)?;
        self.console
            .say(format!("Records file: {}", self.records_path.display()))?;
        self.console
            .say(format!("Images dir:   {}", self.images_dir.display()))?;
        self.console
            .say(format!("Record count: {}", self.store.len()))?;
        self.console.say(&rule)?;
        self.console.say("1. Modify existing file")?;
        self.console.say("2. Rewrite the whole file")?;
        self.console.say("3. View all records")?;
        self.console.say("4. View unused images")?;
        self.console.say("5. Exit")?;
        Ok(())
    }

    fn modify_menu(&mut self) -> Result<()> {
        loop {
            self.console.say("")?;
            self.console.say("=== Modify ===")?;
            self.console.say("1. Add record")?;
            self.console.say("2. Delete record")?;
            self.console.say("3. Edit record")?;
            self.console.say("4. View all records")?;
            self.console.say("5. Save and return")?;

            match self.console.ask("Choose (1-5): ")?.as_str() {
                "1" => loop {
                    self.add_record(false)?;
                    if !self.console.agree("Add another? (y/n): ")? {
                        break;
                    }
                },
                "2" => {
                    while self.delete_record()? {
                        if !self.console.agree("Delete another? (y/n): ")? {
                            break;
                        }
                    }
                }
                "3" => {
                    while self.edit_record()? {
                        if !self.console.agree("Edit another record? (y/n): ")? {
                            break;
                        }
                    }
                }
                "4" => {
                    self.show_records()?;
                    self.console.ask("Press Enter to continue...")?;
                }
                "5" => {
                    self.save()?;
                    return Ok(());
                }
                _ => self.console.say("Invalid choice.")?,
            }
        }
    }

    fn rewrite_all(&mut self) -> Result<()> {
        self.console.say("")?;
        self.console.say("=== Warning ===")?;
        self.console.say("This removes every existing record.")?;
        if !self.console.agree("Clear and start over? (y/n): ")? {
            self.console.say("Cancelled.")?;
            return Ok(());
        }

        self.store.clear();
        self.console.say("All records cleared.")?;

        let mut first_time = true;
        loop {
            self.add_record(first_time)?;
            first_time = false;
            if !self.console.agree("Add another? (y/n): ")? {
                break;
            }
        }

        if self.store.is_empty() {
            self.console
                .say("Nothing was added; the file was left as it was.")?;
        } else {
            self.save()?;
        }
        Ok(())
    }

    fn show_records(&mut self) -> Result<bool> {
        if self.store.is_empty() {
            self.console.say("There are no birthday records yet.")?;
            return Ok(false);
        }

        self.console.say("")?;
        self.console.say("=== Birthday records ===")?;
        let lines: Vec<String> = self
            .store
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| describe(index, record))
            .collect();
        for line in lines {
            self.console.say(line)?;
        }
        Ok(true)
    }

    fn show_unused(&mut self) -> Result<()> {
        let unused = match self.store.list_unused_assets(&self.images_dir) {
            Ok(unused) => unused,
            Err(err) => {
                self.console.say(format!("Could not list images: {err}"))?;
                return Ok(());
            }
        };

        if unused.directory_missing {
            self.console.say(format!(
                "Warning: images directory {} does not exist.",
                self.images_dir.display()
            ))?;
        }
        if unused.files.is_empty() {
            self.console.say(format!(
                "No unused images in {}.",
                self.images_dir.display()
            ))?;
            return Ok(());
        }

        self.console
            .say(format!("Unused images in {}:", self.images_dir.display()))?;
        for name in &unused.files {
            self.console.say(format!("  - {name}"))?;
        }
        Ok(())
    }

    fn add_record(&mut self, first_time: bool) -> Result<()> {
        if first_time {
            self.console.say(format!(
                "Put the avatar images you plan to use into {} first.",
                self.images_dir.display()
            ))?;
            self.console.ask("Press Enter to continue...")?;
        }

        self.console.say("")?;
        self.console.say("=== New birthday record ===")?;

        let name = loop {
            let input = self.console.ask("Name: ")?;
            match normalize_name(&input) {
                Ok(name) => break name,
                Err(err) => self.console.say(format!("{err}"))?,
            }
        };
        let birthday = loop {
            let input = self.console.ask("Birthday (YYYY-MM-DD): ")?;
            match normalize_birthday(&input) {
                Ok(birthday) => break birthday,
                Err(err) => self.console.say(format!("{err}"))?,
            }
        };
        let is_lunar = self
            .console
            .confirm("Celebrated on the lunar calendar? (y/n): ")?;
        let avatar = match self.pick_avatar(false)? {
            AvatarPick::Set(avatar) => avatar,
            AvatarPick::Keep => String::new(),
        };

        match self.store.add_record(&name, &birthday, is_lunar, &avatar) {
            Ok(record) => self.console.say(format!("Added: {}", record.name))?,
            Err(err) => self.console.say(format!("Not added: {err}"))?,
        }
        Ok(())
    }

    fn delete_record(&mut self) -> Result<bool> {
        if !self.show_records()? {
            return Ok(false);
        }

        let Some(index) = self.select_record("Number of the record to delete: ")? else {
            return Ok(false);
        };
        let Some(name) = self.store.get(index).map(|record| record.name.clone()) else {
            return Ok(false);
        };
        self.console.say(format!("About to delete: {name}"))?;
        if !self.console.agree("Confirm delete? (y/n): ")? {
            self.console.say("Delete cancelled.")?;
            return Ok(false);
        }

        match self.store.delete_record(index) {
            Ok(removed) => {
                self.console.say(format!("Deleted: {}", removed.name))?;
                Ok(true)
            }
            Err(err) => {
                self.console.say(format!("{err}"))?;
                Ok(false)
            }
        }
    }

    fn edit_record(&mut self) -> Result<bool> {
        if !self.show_records()? {
            return Ok(false);
        }

        let Some(index) = self.select_record("Number of the record to edit: ")? else {
            return Ok(false);
        };

        loop {
            let Some(record) = self.store.get(index).cloned() else {
                return Ok(false);
            };
            self.console.say("")?;
            self.console.say(format!("Editing: {}", record.name))?;
            self.console.say(format!("1. Name: {}", record.name))?;
            self.console.say(format!("2. Birthday: {}", record.birthday))?;
            self.console
                .say(format!("3. Lunar: {}", yes_no_label(record.is_lunar)))?;
            self.console
                .say(format!("4. Avatar: {}", avatar_label(&record)))?;
            self.console.say("5. Done")?;

            let field = match self.console.ask("Field to change (1-5): ")?.as_str() {
                "1" => {
                    let input = self
                        .console
                        .ask(&format!("New name (current: {}): ", record.name))?;
                    RecordField::Name(input)
                }
                "2" => loop {
                    let input = self
                        .console
                        .ask(&format!("New birthday (current: {}): ", record.birthday))?;
                    if input.is_empty() || normalize_birthday(&input).is_ok() {
                        break RecordField::Birthday(input);
                    }
                    self.console.say("Invalid date, use YYYY-MM-DD.")?;
                },
                "3" => {
                    let prompt = format!(
                        "Lunar calendar? (current: {}) (y/n): ",
                        yes_no_label(record.is_lunar)
                    );
                    match self.console.confirm_or_skip(&prompt)? {
                        Some(value) => RecordField::IsLunar(value),
                        None => continue,
                    }
                }
                "4" => match self.pick_avatar(true)? {
                    AvatarPick::Set(avatar) => RecordField::Avatar(avatar),
                    AvatarPick::Keep => {
                        self.console.say("Avatar left unchanged.")?;
                        continue;
                    }
                },
                "5" => {
                    self.console.say("Editing finished.")?;
                    return Ok(true);
                }
                _ => {
                    self.console.say("Invalid choice.")?;
                    continue;
                }
            };

            match self.store.edit_field(index, field) {
                Ok(EditOutcome::Updated) => self.console.say("Updated.")?,
                Ok(EditOutcome::Unchanged) => self.console.say("No change.")?,
                Err(StoreError::Validation(err)) => self.console.say(format!("{err}"))?,
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn select_record(&mut self, prompt: &str) -> Result<Option<usize>> {
        let input = self.console.ask(prompt)?;
        let index = parse_choice(&input, self.store.len());
        if index.is_none() {
            self.console.say("Invalid number.")?;
        }
        Ok(index)
    }

    /// Avatar picker shared by add and edit.
    ///
    /// For edits, typing nothing skips; for new records it means no avatar.
    fn pick_avatar(&mut self, editing: bool) -> Result<AvatarPick> {
        self.console.say("")?;
        self.console.say("Choose an avatar image:")?;
        self.console.say("1. Pick from unused images")?;
        self.console.say("2. Type a filename")?;
        if editing {
            self.console.say("3. Clear avatar")?;
            self.console.say("4. Skip (keep current)")?;
        } else {
            self.console.say("3. No avatar")?;
        }

        loop {
            let prompt = if editing { "Choose (1-4): " } else { "Choose (1-3): " };
            match self.console.ask(prompt)?.as_str() {
                "1" => {
                    if let Some(name) = self.pick_unused_image()? {
                        return Ok(AvatarPick::Set(name));
                    }
                    if editing {
                        return Ok(AvatarPick::Keep);
                    }
                }
                "2" => {
                    let name = self.console.ask("Image filename (with extension): ")?;
                    if name.is_empty() {
                        if editing {
                            return Ok(AvatarPick::Keep);
                        }
                        self.console.say("Using no avatar.")?;
                        return Ok(AvatarPick::Set(String::new()));
                    }
                    if RecordStore::avatar_file_exists(&self.images_dir, &name) {
                        return Ok(AvatarPick::Set(name));
                    }
                    self.console.say(format!(
                        "Warning: {} does not exist.",
                        self.images_dir.join(&name).display()
                    ))?;
                    if self.console.agree("Use this filename anyway? (y/n): ")? {
                        return Ok(AvatarPick::Set(name));
                    }
                }
                "3" => return Ok(AvatarPick::Set(String::new())),
                "4" if editing => return Ok(AvatarPick::Keep),
                _ => self.console.say("Invalid choice.")?,
            }
        }
    }

    fn pick_unused_image(&mut self) -> Result<Option<String>> {
        let unused = match self.store.list_unused_assets(&self.images_dir) {
            Ok(unused) => unused,
            Err(err) => {
                self.console.say(format!("Could not list images: {err}"))?;
                return Ok(None);
            }
        };
        if unused.directory_missing {
            self.console.say(format!(
                "Warning: images directory {} does not exist.",
                self.images_dir.display()
            ))?;
        }
        if unused.files.is_empty() {
            self.console.say("No unused images found.")?;
            return Ok(None);
        }

        self.console.say("Unused images:")?;
        for (position, name) in unused.files.iter().enumerate() {
            self.console.say(format!("{}. {name}", position + 1))?;
        }
        let input = self
            .console
            .ask(&format!("Pick an image (1-{}): ", unused.files.len()))?;
        match parse_choice(&input, unused.files.len()) {
            Some(index) => Ok(unused.files.into_iter().nth(index)),
            None => {
                self.console.say("Invalid choice.")?;
                Ok(None)
            }
        }
    }

    fn save(&mut self) -> Result<()> {
        match self.store.save(&self.records_path) {
            Ok(()) => self
                .console
                .say(format!("Saved to {}", self.records_path.display()))?,
            Err(err) => self.console.say(format!("Save failed: {err}"))?,
        }
        Ok(())
    }
}

/// Renders one record for listings, numbered from 1.
pub fn describe(index: usize, record: &BirthdayRecord) -> String {
    format!(
        "{}. {}\n   Birthday: {}\n   Lunar: {}\n   Avatar: {}\n",
        index + 1,
        record.name,
        record.birthday,
        yes_no_label(record.is_lunar),
        avatar_label(record)
    )
}

fn yes_no_label(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn avatar_label(record: &BirthdayRecord) -> &str {
    record.avatar().unwrap_or("none")
}
