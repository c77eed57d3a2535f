//! The interactive command loop.
//!
//! Every command reads its own arguments, runs one area operation and writes
//! either the success lines or the error message. Only `bounds`, `load`,
//! `help` and `exit` work before an area exists.

use std::io::{BufRead, Write};

use campus_core::Cursor;
use campus_directory::{Entity, RatedEntity};
use tracing::{debug, trace};

use crate::error::{CommandError, SessionError};
use crate::input::CommandReader;
use crate::manager::SystemManager;
use crate::model::{ServiceType, StudentType};

pub const UNKNOWN_COMMAND: &str = "Unknown command. Type help to see available commands.";
pub const FAREWELL: &str = "Bye!";

pub const HELP_TEXT: &str = "\
bounds - Defines the new geographic bounding rectangle
save - Saves the current geographic bounding rectangle to a text file
load - Load a geographic bounding rectangle from a text file
service - Adds a new service to the current geographic bounding rectangle. The service may be eating, lodging or leisure
services - Displays the list of services in current geographic bounding rectangle, in order of registration
student - Adds a student to the current geographic bounding rectangle
students - Lists all the students or those of a given country in the current geographic bounding rectangle, in alphabetical order of the student's name
leave - Removes a student from the the current geographic bounding rectangle
go - Changes the location of a student to a leisure service, or eating service
move - Changes the home of a student
users - List all students who are in a given service (eating or lodging)
star - Evaluates a service
where - Locates a student
visited - Lists locations visited by one student
ranking - Lists services ordered by star
ranked - Lists the service(s) of the indicated type with the given score that are closer to the student location
tag - Lists all services that have at least one review whose description contains the specified word
find - Finds the most relevant service of a certain type, for a specific student
help - Shows the available commands
exit - Terminates the execution of the program";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Bounds,
    Save,
    Load,
    Service,
    Services,
    Student,
    Students,
    Leave,
    Go,
    Move,
    Users,
    Star,
    Where,
    Visited,
    Ranking,
    Ranked,
    Tag,
    Find,
    Help,
    Exit,
}

impl Command {
    fn parse(token: &str) -> Option<Command> {
        let command = match token.to_lowercase().as_str() {
            "bounds" => Command::Bounds,
            "save" => Command::Save,
            "load" => Command::Load,
            "service" => Command::Service,
            "services" => Command::Services,
            "student" => Command::Student,
            "students" => Command::Students,
            "leave" => Command::Leave,
            "go" => Command::Go,
            "move" => Command::Move,
            "users" => Command::Users,
            "star" => Command::Star,
            "where" => Command::Where,
            "visited" => Command::Visited,
            "ranking" => Command::Ranking,
            "ranked" => Command::Ranked,
            "tag" => Command::Tag,
            "find" => Command::Find,
            "help" => Command::Help,
            "exit" => Command::Exit,
            _ => return None,
        };
        Some(command)
    }

    fn needs_area(self) -> bool {
        !matches!(self, Command::Bounds | Command::Load | Command::Help | Command::Exit)
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Runs commands from `R` against a [`SystemManager`], writing to `W`.
///
pub struct Interpreter<R, W> {
    reader: CommandReader<R>,
    out: W,
    manager: SystemManager,
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub fn new(input: R, out: W, manager: SystemManager) -> Self {
        Self {
            reader: CommandReader::new(input),
            out,
            manager,
        }
    }

    pub fn manager(&self) -> &SystemManager {
        &self.manager
    }

    /// Runs until `exit` or end of input. Running out of input saves the
    /// current area like `exit` does, without the farewell.
    ///
    pub fn run(&mut self) -> Result<(), SessionError> {
        loop {
            let outcome = self.reader.next_token().and_then(|token| self.dispatch(&token));
            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(SessionError::NotANumber(found)) => {
                    debug!(%found, "malformed argument");
                    self.reader.skip_line();
                    writeln!(self.out, "{UNKNOWN_COMMAND}")?;
                }
                Err(SessionError::Exhausted) => {
                    debug!("input exhausted");
                    self.manager.shutdown();
                    return Ok(());
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn dispatch(&mut self, token: &str) -> Result<Flow, SessionError> {
        let has_area = self.manager.has_area();
        let command = match Command::parse(token) {
            Some(command) => command,
            None => {
                trace!(token, "unknown command");
                self.reader.skip_line();
                if has_area {
                    writeln!(self.out, "{UNKNOWN_COMMAND}")?;
                }
                return Ok(Flow::Continue);
            }
        };
        if !has_area && command.needs_area() {
            self.reader.skip_line();
            writeln!(self.out, "{}", CommandError::NoAreaLoaded)?;
            return Ok(Flow::Continue);
        }

        trace!(?command, "dispatch");
        match command {
            Command::Bounds => self.bounds()?,
            Command::Save => self.save()?,
            Command::Load => self.load()?,
            Command::Service => self.service()?,
            Command::Services => self.services()?,
            Command::Student => self.student()?,
            Command::Students => self.students()?,
            Command::Leave => self.leave()?,
            Command::Go => self.go()?,
            Command::Move => self.move_home()?,
            Command::Users => self.users()?,
            Command::Star => self.star()?,
            Command::Where => self.locate()?,
            Command::Visited => self.visited()?,
            Command::Ranking => self.ranking()?,
            Command::Ranked => self.ranked()?,
            Command::Tag => self.tag()?,
            Command::Find => self.find()?,
            Command::Help => writeln!(self.out, "{HELP_TEXT}")?,
            Command::Exit => {
                self.manager.shutdown();
                writeln!(self.out, "{FAREWELL}")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    // ========================================================================
    // Areas
    // ========================================================================

    fn bounds(&mut self) -> Result<(), SessionError> {
        let top = self.reader.next_number()?;
        let left = self.reader.next_number()?;
        let bottom = self.reader.next_number()?;
        let right = self.reader.next_number()?;
        let name = self.reader.next_line()?;

        match self.manager.create_area(&name, top, left, bottom, right) {
            Ok(_) => writeln!(self.out, "{name} created.")?,
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), SessionError> {
        match self.manager.save_area() {
            Ok(area) => writeln!(self.out, "{} saved.", area.name())?,
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    fn load(&mut self) -> Result<(), SessionError> {
        let name = self.reader.next_line()?;
        match self.manager.load_area(&name) {
            Ok(area) => writeln!(self.out, "{} loaded.", area.name())?,
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    // ========================================================================
    // Services
    // ========================================================================

    fn service(&mut self) -> Result<(), SessionError> {
        let kind = ServiceType::parse(&self.reader.next_token()?);
        let latitude = self.reader.next_number()?;
        let longitude = self.reader.next_number()?;
        let price = self.reader.next_number()?;
        let value = self.reader.next_number()?;
        let name = self.reader.next_line()?;

        let added = self
            .manager
            .area_mut()
            .and_then(|area| area.add_service(kind, &name, latitude, longitude, price, value));
        match added {
            Ok(service) => writeln!(self.out, "{} {name} added.", service.category())?,
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    fn services(&mut self) -> Result<(), SessionError> {
        let area = match self.manager.area() {
            Ok(area) => area,
            Err(error) => {
                writeln!(self.out, "{error}")?;
                return Ok(());
            }
        };
        if area.services().is_empty() {
            writeln!(self.out, "No services yet!")?;
            return Ok(());
        }
        for service in area.services().iter() {
            let service = service.borrow();
            writeln!(
                self.out,
                "{}: {} ({}, {}).",
                service.name(),
                service.service_type(),
                service.latitude(),
                service.longitude()
            )?;
        }
        Ok(())
    }

    fn star(&mut self) -> Result<(), SessionError> {
        let stars = self.reader.next_number()?;
        let name = self.reader.next_line()?;
        let description = self.reader.next_line()?;

        let reviewed = self
            .manager
            .area_mut()
            .and_then(|area| area.add_review(&name, stars, &description));
        match reviewed {
            Ok(()) => writeln!(self.out, "Your evaluation has been registered!")?,
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    fn ranking(&mut self) -> Result<(), SessionError> {
        let area = match self.manager.area() {
            Ok(area) => area,
            Err(error) => {
                writeln!(self.out, "{error}")?;
                return Ok(());
            }
        };
        let mut ranking = area.ranking();
        if !ranking.has_next() {
            writeln!(self.out, "No services in the system.")?;
            return Ok(());
        }
        writeln!(self.out, "Services sorted in descending order")?;
        for service in ranking.by_ref() {
            writeln!(self.out, "{}: {}", service.name(), service.stars())?;
        }
        Ok(())
    }

    fn ranked(&mut self) -> Result<(), SessionError> {
        let kind = ServiceType::parse(&self.reader.next_token()?);
        let stars = self.reader.next_number()?;
        let student = self.reader.next_line()?;

        match self.manager.area().and_then(|area| area.ranked(kind, stars, &student)) {
            Ok(closest) => {
                if let Some(kind) = kind {
                    writeln!(self.out, "{kind} services closer with {stars} average")?;
                }
                for service in &closest {
                    writeln!(self.out, "{}", service.name())?;
                }
            }
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    fn tag(&mut self) -> Result<(), SessionError> {
        let term = self.reader.next_line()?.to_lowercase();
        let area = match self.manager.area() {
            Ok(area) => area,
            Err(error) => {
                writeln!(self.out, "{error}")?;
                return Ok(());
            }
        };
        let mut tagged = area.tagged(&term);
        if !tagged.has_next() {
            writeln!(self.out, "There are no services with this tag!")?;
            return Ok(());
        }
        for service in tagged.by_ref() {
            writeln!(self.out, "{} {}", service.category(), service.name())?;
        }
        Ok(())
    }

    fn users(&mut self) -> Result<(), SessionError> {
        let order = self.reader.next_token()?;
        let name = self.reader.next_line()?;

        match self.manager.area().and_then(|area| area.users(&order, &name)) {
            Ok((service, users)) if users.is_empty() => {
                writeln!(self.out, "No students on {}!", service.name())?;
            }
            Ok((_, users)) => {
                for user in &users {
                    let user = user.borrow();
                    writeln!(self.out, "{}: {}", user.name(), user.student_type())?;
                }
            }
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    // ========================================================================
    // Students
    // ========================================================================

    fn student(&mut self) -> Result<(), SessionError> {
        let kind = StudentType::parse(&self.reader.next_line()?);
        let name = self.reader.next_line()?;
        let country = self.reader.next_line()?;
        let lodging = self.reader.next_line()?;

        let added = self
            .manager
            .area_mut()
            .and_then(|area| area.add_student(kind, &name, &country, &lodging));
        match added {
            Ok(_) => writeln!(self.out, "{name} added.")?,
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    fn students(&mut self) -> Result<(), SessionError> {
        let filter = self.reader.next_line()?;
        let area = match self.manager.area() {
            Ok(area) => area,
            Err(error) => {
                writeln!(self.out, "{error}")?;
                return Ok(());
            }
        };
        let mut students = area.list_students(&filter);
        if !students.has_next() {
            if filter.eq_ignore_ascii_case("all") {
                writeln!(self.out, "No students yet!")?;
            } else {
                writeln!(self.out, "No students from {filter}!")?;
            }
            return Ok(());
        }
        for student in students.by_ref() {
            let student = student.borrow();
            writeln!(
                self.out,
                "{}: {} at {}.",
                student.name(),
                student.student_type(),
                student.location().name()
            )?;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<(), SessionError> {
        let name = self.reader.next_line()?;
        match self.manager.area_mut().and_then(|area| area.remove_student(&name)) {
            Ok(student) => writeln!(self.out, "{} has left.", student.name())?,
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    fn go(&mut self) -> Result<(), SessionError> {
        let student = self.reader.next_line()?;
        let service = self.reader.next_line()?;

        match self.manager.area_mut().and_then(|area| area.go(&student, &service)) {
            Ok(outing) => {
                let student = outing.student.name();
                let service = outing.service.name();
                if outing.distracted {
                    writeln!(self.out, "{student} is now at {service}. {student} is distracted!")?;
                } else {
                    writeln!(self.out, "{student} is now at {service}.")?;
                }
            }
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    fn move_home(&mut self) -> Result<(), SessionError> {
        let student = self.reader.next_line()?;
        let lodging = self.reader.next_line()?;

        match self
            .manager
            .area_mut()
            .and_then(|area| area.move_home(&student, &lodging))
        {
            Ok((student, lodging)) => {
                let student = student.name();
                writeln!(
                    self.out,
                    "lodging {} is now {student}'s home. {student} is at home.",
                    lodging.name()
                )?;
            }
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    fn locate(&mut self) -> Result<(), SessionError> {
        let name = self.reader.next_line()?;
        match self.manager.area().and_then(|area| area.locate(&name)) {
            Ok((student, location)) => {
                let location = location.borrow();
                writeln!(
                    self.out,
                    "{} is at {} {} ({}, {}).",
                    student.name(),
                    location.name(),
                    location.service_type(),
                    location.latitude(),
                    location.longitude()
                )?;
            }
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    fn visited(&mut self) -> Result<(), SessionError> {
        let name = self.reader.next_line()?;
        match self.manager.area().and_then(|area| area.visited(&name)) {
            Ok((_, visited)) => {
                for service in &visited {
                    writeln!(self.out, "{}", service.name())?;
                }
            }
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }

    fn find(&mut self) -> Result<(), SessionError> {
        let student = self.reader.next_line()?;
        let kind = ServiceType::parse(&self.reader.next_line()?);
        match self.manager.area().and_then(|area| area.find(&student, kind)) {
            Ok(service) => writeln!(self.out, "{}", service.name())?,
            Err(error) => writeln!(self.out, "{error}")?,
        }
        Ok(())
    }
}
