/// A sessions payload as written by an earlier version of the client: two
/// chats, the newest first, one of them already titled.
pub fn sessions_fixture() -> &'static str {
    return r#"
[
  {
    "id": "8c1f2a9e-41d7",
    "name": "Quarterly planning notes",
    "messages": [
      { "role": "assistant", "content": "Hi! I'm Solendir, your company AI assistant." },
      { "role": "user", "content": "Where are the Q3 planning notes?", "time": "2024-05-02T09:14:03Z" },
      { "role": "assistant", "content": "They're in the **Planning** database in Notion.", "time": "2024-05-02T09:14:09Z" }
    ]
  },
  {
    "id": "1b0e77c4-9a20",
    "name": "New Chat",
    "messages": [
      { "role": "assistant", "content": "Hi! I'm Solendir, your company AI assistant." }
    ]
  }
]
"#
    .trim();
}

pub fn long_reply_fixture() -> &'static str {
    return r#"
Here's what I found in your workspace.

- Page: Diet tracker (https://www.notion.so/diet-tracker)
- Database: Roadmap (https://www.notion.so/roadmap)

Both were edited this week.
"#
    .trim();
}
