#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .split_whitespace()
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        if args.is_empty() {
            return None;
        }

        let prefix = args.remove(0);
        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_new_session()
            || cmd.is_delete_session()
            || cmd.is_select_session()
            || cmd.is_apps()
            || cmd.is_connect()
            || cmd.is_disconnect()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_new_session(&self) -> bool {
        return ["/n", "/new"].contains(&self.command.as_str());
    }

    pub fn is_delete_session(&self) -> bool {
        return ["/d", "/delete"].contains(&self.command.as_str());
    }

    pub fn is_select_session(&self) -> bool {
        return ["/s", "/select"].contains(&self.command.as_str());
    }

    pub fn is_apps(&self) -> bool {
        return ["/a", "/apps"].contains(&self.command.as_str());
    }

    pub fn is_connect(&self) -> bool {
        return self.command == "/connect";
    }

    pub fn is_disconnect(&self) -> bool {
        return self.command == "/disconnect";
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    /// Parses a 1-based session number argument into a 0-based index.
    pub fn session_index(&self) -> Option<usize> {
        let number = self.args.first()?.parse::<usize>().ok()?;
        return number.checked_sub(1);
    }
}
