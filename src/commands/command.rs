//! Command classification and construction.
//!
//! A decoded request (`[VERB, key, args...]`) is classified into exactly one
//! of seven families by verb. Unrecognized verbs produce no command at all and
//! the request is silently dropped. Recognized verbs always produce a command;
//! arity violations mark it invalid, and an invalid command short-circuits
//! execution to a single empty-string response.

/// A fully classified request, ready for the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Str(StrCommand),
    List(ListCommand),
    Hash(HashCommand),
    Set(SetCommand),
    ZSet(ZSetCommand),
    Db(DbCommand),
    Cli(CliCommand),
}

impl Command {
    /// Classifies and constructs a command from decoded request tokens.
    ///
    /// Returns `None` for an empty request or an unrecognized verb.
    pub fn from_request(source: &[String]) -> Option<Command> {
        let verb = source.first()?.as_str();
        if let Some(v) = CliVerb::parse(verb) {
            return Some(Command::Cli(CliCommand::new(v, source)));
        }
        if let Some(v) = DbVerb::parse(verb) {
            return Some(Command::Db(DbCommand::new(v, source)));
        }
        if let Some(v) = StrVerb::parse(verb) {
            return Some(Command::Str(StrCommand::new(v, source)));
        }
        if let Some(v) = ListVerb::parse(verb) {
            return Some(Command::List(ListCommand::new(v, source)));
        }
        if let Some(v) = SetVerb::parse(verb) {
            return Some(Command::Set(SetCommand::new(v, source)));
        }
        if let Some(v) = ZSetVerb::parse(verb) {
            return Some(Command::ZSet(ZSetCommand::new(v, source)));
        }
        if let Some(v) = HashVerb::parse(verb) {
            return Some(Command::Hash(HashCommand::new(v, source)));
        }
        None
    }

    /// Whether construction accepted the request's arity.
    pub fn is_valid(&self) -> bool {
        match self {
            Command::Str(c) => c.valid,
            Command::List(c) => c.valid,
            Command::Hash(c) => c.valid,
            Command::Set(c) => c.valid,
            Command::ZSet(c) => c.valid,
            Command::Db(c) => c.valid,
            Command::Cli(c) => c.valid,
        }
    }
}

/// Base construction shared by every family: `verb + key`.
fn base_key(source: &[String]) -> Option<String> {
    if source.len() < 2 {
        return None;
    }
    Some(source[1].clone())
}

// ============================================================================
// Str
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrVerb {
    Set,
    Get,
    Append,
    Len,
    IncrBy,
    DecrBy,
}

impl StrVerb {
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "SET" => Some(Self::Set),
            "GET" => Some(Self::Get),
            "APPEND" => Some(Self::Append),
            "LEN" => Some(Self::Len),
            "INCRBY" => Some(Self::IncrBy),
            "DECRBY" => Some(Self::DecrBy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrCommand {
    pub valid: bool,
    pub verb: StrVerb,
    pub key: String,
    pub value: Option<String>,
}

impl StrCommand {
    fn new(verb: StrVerb, source: &[String]) -> Self {
        let Some(key) = base_key(source) else {
            return Self {
                valid: false,
                verb,
                key: String::new(),
                value: None,
            };
        };
        match verb {
            StrVerb::Get | StrVerb::Len => Self {
                valid: true,
                verb,
                key,
                value: None,
            },
            _ => {
                let valid = source.len() >= 3;
                Self {
                    valid,
                    verb,
                    key,
                    value: source.get(2).cloned(),
                }
            }
        }
    }
}

// ============================================================================
// List
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListVerb {
    PushFront,
    PushBack,
    PopFront,
    PopBack,
    Index,
    Rem,
    Trim,
    Len,
}

impl ListVerb {
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "LPUSHF" => Some(Self::PushFront),
            "LPUSHB" => Some(Self::PushBack),
            "LPOPF" => Some(Self::PopFront),
            "LPOPB" => Some(Self::PopBack),
            "LINDEX" => Some(Self::Index),
            "LREM" => Some(Self::Rem),
            "LTRIM" => Some(Self::Trim),
            "LLEN" => Some(Self::Len),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCommand {
    pub valid: bool,
    pub verb: ListVerb,
    pub key: String,
    pub values: Vec<String>,
}

impl ListCommand {
    fn new(verb: ListVerb, source: &[String]) -> Self {
        let Some(key) = base_key(source) else {
            return Self {
                valid: false,
                verb,
                key: String::new(),
                values: Vec::new(),
            };
        };
        match verb {
            ListVerb::PopFront | ListVerb::PopBack | ListVerb::Len => Self {
                valid: true,
                verb,
                key,
                values: Vec::new(),
            },
            _ => Self {
                valid: source.len() >= 3,
                verb,
                key,
                values: source[2.min(source.len())..].to_vec(),
            },
        }
    }
}

// ============================================================================
// Set
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetVerb {
    Add,
    Card,
    IsMember,
    Members,
    RandMember,
    Pop,
    Rem,
    Inter,
    Diff,
}

impl SetVerb {
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "SADD" => Some(Self::Add),
            "SCARD" => Some(Self::Card),
            "SISMEMBER" => Some(Self::IsMember),
            "SMEMBERS" => Some(Self::Members),
            "SRANDMEMBER" => Some(Self::RandMember),
            "SPOP" => Some(Self::Pop),
            "SREM" => Some(Self::Rem),
            "SINTER" => Some(Self::Inter),
            "SDIFF" => Some(Self::Diff),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCommand {
    pub valid: bool,
    pub verb: SetVerb,
    pub key: String,
    pub values: Vec<String>,
}

impl SetCommand {
    fn new(verb: SetVerb, source: &[String]) -> Self {
        let Some(key) = base_key(source) else {
            return Self {
                valid: false,
                verb,
                key: String::new(),
                values: Vec::new(),
            };
        };
        match verb {
            SetVerb::Card | SetVerb::Members | SetVerb::RandMember | SetVerb::Pop => Self {
                valid: true,
                verb,
                key,
                values: Vec::new(),
            },
            _ => Self {
                valid: source.len() >= 3,
                verb,
                key,
                values: source[2.min(source.len())..].to_vec(),
            },
        }
    }
}

// ============================================================================
// ZSet
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZSetVerb {
    Add,
    Card,
    Count,
    LexCount,
    IncrBy,
    DecrBy,
    Rem,
    Range,
    RangeByScore,
    RangeByLex,
}

impl ZSetVerb {
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "ZADD" => Some(Self::Add),
            "ZCARD" => Some(Self::Card),
            "ZCOUNT" => Some(Self::Count),
            "ZLEXCOUNT" => Some(Self::LexCount),
            "ZINCRBY" => Some(Self::IncrBy),
            "ZDECRBY" => Some(Self::DecrBy),
            "ZREM" => Some(Self::Rem),
            "ZRANGE" => Some(Self::Range),
            "ZRANGEBYSCORE" => Some(Self::RangeByScore),
            "ZRANGEBYLEX" => Some(Self::RangeByLex),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZSetCommand {
    pub valid: bool,
    pub verb: ZSetVerb,
    pub key: String,
    pub values: Vec<String>,
}

impl ZSetCommand {
    fn new(verb: ZSetVerb, source: &[String]) -> Self {
        let Some(key) = base_key(source) else {
            return Self {
                valid: false,
                verb,
                key: String::new(),
                values: Vec::new(),
            };
        };
        if verb == ZSetVerb::Card {
            return Self {
                valid: true,
                verb,
                key,
                values: Vec::new(),
            };
        }
        // Every value-taking sorted-set verb works in pairs, so the whole
        // request must be even-sized as well as carrying at least one value.
        let valid = source.len() >= 3 && source.len() % 2 == 0;
        Self {
            valid,
            verb,
            key,
            values: source[2.min(source.len())..].to_vec(),
        }
    }
}

// ============================================================================
// Hash
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashVerb {
    Get,
    Set,
    Exist,
    Del,
    Len,
    GetAll,
    IncrBy,
    DecrBy,
}

impl HashVerb {
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "HGET" => Some(Self::Get),
            "HSET" => Some(Self::Set),
            "HEXIST" => Some(Self::Exist),
            "HDEL" => Some(Self::Del),
            "HLEN" => Some(Self::Len),
            "HGETALL" => Some(Self::GetAll),
            "HINCRBY" => Some(Self::IncrBy),
            "HDECRBY" => Some(Self::DecrBy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashCommand {
    pub valid: bool,
    pub verb: HashVerb,
    pub key: String,
    pub values: Vec<String>,
}

impl HashCommand {
    fn new(verb: HashVerb, source: &[String]) -> Self {
        let Some(key) = base_key(source) else {
            return Self {
                valid: false,
                verb,
                key: String::new(),
                values: Vec::new(),
            };
        };
        if matches!(verb, HashVerb::Len | HashVerb::GetAll) {
            return Self {
                valid: true,
                verb,
                key,
                values: Vec::new(),
            };
        }
        let mut valid = source.len() >= 3;
        // Field/value pairs: the whole request must be even-sized.
        if matches!(verb, HashVerb::Set | HashVerb::IncrBy | HashVerb::DecrBy)
            && source.len() % 2 != 0
        {
            valid = false;
        }
        Self {
            valid,
            verb,
            key,
            values: source[2.min(source.len())..].to_vec(),
        }
    }
}

// ============================================================================
// Db
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbVerb {
    Del,
    Expire,
}

impl DbVerb {
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "DEL" => Some(Self::Del),
            "EXPIRE" => Some(Self::Expire),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCommand {
    pub valid: bool,
    pub verb: DbVerb,
    pub key: String,
    pub value: Option<String>,
}

impl DbCommand {
    fn new(verb: DbVerb, source: &[String]) -> Self {
        let Some(key) = base_key(source) else {
            return Self {
                valid: false,
                verb,
                key: String::new(),
                value: None,
            };
        };
        match verb {
            DbVerb::Del => Self {
                valid: true,
                verb,
                key,
                value: None,
            },
            DbVerb::Expire => Self {
                valid: source.len() >= 3,
                verb,
                key,
                value: source.get(2).cloned(),
            },
        }
    }
}

// ============================================================================
// Cli
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Select,
    Drop,
}

impl CliVerb {
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "SELECT" => Some(Self::Select),
            "DROP" => Some(Self::Drop),
            _ => None,
        }
    }
}

/// Connection-level command. The SELECT target (a database number) travels in
/// the key position: `["SELECT","3"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliCommand {
    pub valid: bool,
    pub verb: CliVerb,
    pub target: String,
}

impl CliCommand {
    fn new(verb: CliVerb, source: &[String]) -> Self {
        match base_key(source) {
            Some(target) => Self {
                valid: true,
                verb,
                target,
            },
            None => Self {
                valid: false,
                verb,
                target: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_unknown_verb_produces_no_command() {
        assert_eq!(Command::from_request(&req(&["FROB", "x"])), None);
        assert_eq!(Command::from_request(&req(&["set", "x", "1"])), None); // case-sensitive
        assert_eq!(Command::from_request(&[]), None);
    }

    #[test]
    fn test_each_family_claims_its_verbs() {
        assert!(matches!(
            Command::from_request(&req(&["SELECT", "1"])),
            Some(Command::Cli(_))
        ));
        assert!(matches!(
            Command::from_request(&req(&["DEL", "k"])),
            Some(Command::Db(_))
        ));
        assert!(matches!(
            Command::from_request(&req(&["SET", "k", "v"])),
            Some(Command::Str(_))
        ));
        assert!(matches!(
            Command::from_request(&req(&["LPUSHB", "l", "v"])),
            Some(Command::List(_))
        ));
        assert!(matches!(
            Command::from_request(&req(&["SADD", "s", "m"])),
            Some(Command::Set(_))
        ));
        assert!(matches!(
            Command::from_request(&req(&["ZADD", "z", "1", "m"])),
            Some(Command::ZSet(_))
        ));
        assert!(matches!(
            Command::from_request(&req(&["HSET", "h", "f", "v"])),
            Some(Command::Hash(_))
        ));
    }

    #[test]
    fn test_base_arity_requires_verb_and_key() {
        let cmd = Command::from_request(&req(&["GET"])).unwrap();
        assert!(!cmd.is_valid());
        let cmd = Command::from_request(&req(&["GET", "k"])).unwrap();
        assert!(cmd.is_valid());
    }

    #[test]
    fn test_value_free_verbs_valid_with_key_only() {
        for tokens in [
            ["GET", "k"],
            ["LEN", "k"],
            ["LPOPF", "k"],
            ["LPOPB", "k"],
            ["LLEN", "k"],
            ["SCARD", "k"],
            ["SRANDMEMBER", "k"],
            ["SMEMBERS", "k"],
            ["SPOP", "k"],
            ["ZCARD", "k"],
            ["HLEN", "k"],
            ["HGETALL", "k"],
            ["DEL", "k"],
        ] {
            let cmd = Command::from_request(&req(&tokens)).unwrap();
            assert!(cmd.is_valid(), "{:?} should be valid", tokens);
        }
    }

    #[test]
    fn test_value_taking_verbs_need_a_value() {
        for tokens in [["SET", "k"], ["APPEND", "k"], ["LINDEX", "l"], ["EXPIRE", "k"]] {
            let cmd = Command::from_request(&req(&tokens)).unwrap();
            assert!(!cmd.is_valid(), "{:?} should be invalid", tokens);
        }
    }

    #[test]
    fn test_zset_pair_arity() {
        assert!(Command::from_request(&req(&["ZADD", "z", "1", "m"]))
            .unwrap()
            .is_valid());
        // Odd total size: a dangling score with no member.
        assert!(!Command::from_request(&req(&["ZADD", "z", "1"]))
            .unwrap()
            .is_valid());
        assert!(!Command::from_request(&req(&["ZADD", "z", "1", "m", "2"]))
            .unwrap()
            .is_valid());
        assert!(Command::from_request(&req(&["ZCOUNT", "z", "0", "9"]))
            .unwrap()
            .is_valid());
        // ZCARD is exempt from the pair rule.
        assert!(Command::from_request(&req(&["ZCARD", "z"]))
            .unwrap()
            .is_valid());
    }

    #[test]
    fn test_hash_pair_arity() {
        assert!(Command::from_request(&req(&["HSET", "h", "f", "v"]))
            .unwrap()
            .is_valid());
        assert!(!Command::from_request(&req(&["HSET", "h", "f"]))
            .unwrap()
            .is_valid());
        assert!(!Command::from_request(&req(&["HINCRBY", "h", "f"]))
            .unwrap()
            .is_valid());
        // HGET takes bare fields, no pair rule.
        assert!(Command::from_request(&req(&["HGET", "h", "f"]))
            .unwrap()
            .is_valid());
    }

    #[test]
    fn test_command_fields_populated() {
        let Some(Command::ZSet(cmd)) = Command::from_request(&req(&["ZADD", "z", "1", "m"]))
        else {
            panic!("expected zset command");
        };
        assert_eq!(cmd.verb, ZSetVerb::Add);
        assert_eq!(cmd.key, "z");
        assert_eq!(cmd.values, vec!["1", "m"]);

        let Some(Command::Cli(cmd)) = Command::from_request(&req(&["SELECT", "3"])) else {
            panic!("expected cli command");
        };
        assert_eq!(cmd.verb, CliVerb::Select);
        assert_eq!(cmd.target, "3");
    }
}
