//! Per-family command execution against a borrowed database.
//!
//! Every family follows the same contract:
//!
//! 1. An invalid command answers `[""]` without touching the keyspace.
//! 2. A missing key is only created by the family's single creating verb
//!    (SET, LPUSHF/LPUSHB, HSET, SADD, ZADD); every other verb soft-fails.
//! 3. A key holding another type soft-fails (the typed accessors on
//!    [`Object`] return `None` for a mismatch).
//! 4. The verb logic runs against the resolved object, borrowed only for the
//!    duration of this call.
//!
//! Soft failures are ordinary `[""]` payloads, indistinguishable on the wire
//! from an empty value; they never terminate the connection. Numeric arguments
//! are validated explicitly — a malformed request must never panic the shared
//! scheduler task that calls into here.

use crate::commands::command::{
    Command, HashCommand, HashVerb, ListCommand, ListVerb, SetCommand, SetVerb, StrCommand,
    StrVerb, ZSetCommand, ZSetVerb,
};
use crate::object::{Object, ObjectType};
use crate::storage::Db;

/// Positive acknowledgement for mutation-only verbs.
pub const OK: &str = "OK";

/// Reported when an integer sub-operation fails (non-numeric target or delta).
pub const FAILED: &str = "Failed";

/// The soft-failure / empty-value response.
pub(crate) fn nil() -> Vec<String> {
    vec![String::new()]
}

pub(crate) fn ok() -> Vec<String> {
    vec![OK.to_string()]
}

pub(crate) fn failed() -> Vec<String> {
    vec![FAILED.to_string()]
}

/// Executes an object-family command against `db`.
///
/// Db and Cli commands are the scheduler's business (they need the database
/// collection and the connection's selection); routed here they soft-fail.
pub fn execute(command: &Command, db: &mut Db) -> Vec<String> {
    if !command.is_valid() {
        return nil();
    }
    match command {
        Command::Str(cmd) => exec_str(cmd, db),
        Command::List(cmd) => exec_list(cmd, db),
        Command::Hash(cmd) => exec_hash(cmd, db),
        Command::Set(cmd) => exec_set(cmd, db),
        Command::ZSet(cmd) => exec_zset(cmd, db),
        Command::Db(_) | Command::Cli(_) => nil(),
    }
}

fn exec_str(cmd: &StrCommand, db: &mut Db) -> Vec<String> {
    if !db.contains(&cmd.key) {
        if cmd.verb != StrVerb::Set {
            return nil();
        }
        db.create(cmd.key.clone(), Object::new(ObjectType::Str));
    }
    let Some(s) = db.get_mut(&cmd.key).and_then(Object::as_str_mut) else {
        return nil();
    };

    let value = cmd.value.as_deref().unwrap_or("");
    match cmd.verb {
        StrVerb::Set => {
            s.set(value);
            ok()
        }
        StrVerb::Get => vec![s.get().to_string()],
        StrVerb::Append => {
            s.append(value);
            ok()
        }
        StrVerb::Len => vec![s.len().to_string()],
        StrVerb::IncrBy | StrVerb::DecrBy => {
            let Ok(n) = value.parse::<i64>() else {
                return failed();
            };
            let done = match cmd.verb {
                StrVerb::IncrBy => s.incr_by(n),
                _ => s.decr_by(n),
            };
            if done {
                ok()
            } else {
                failed()
            }
        }
    }
}

fn exec_list(cmd: &ListCommand, db: &mut Db) -> Vec<String> {
    if !db.contains(&cmd.key) {
        if !matches!(cmd.verb, ListVerb::PushFront | ListVerb::PushBack) {
            return nil();
        }
        db.create(cmd.key.clone(), Object::new(ObjectType::List));
    }
    let Some(list) = db.get_mut(&cmd.key).and_then(Object::as_list_mut) else {
        return nil();
    };

    match cmd.verb {
        ListVerb::PushFront => {
            for value in &cmd.values {
                list.push_front(value.clone());
            }
            ok()
        }
        ListVerb::PushBack => {
            for value in &cmd.values {
                list.push_back(value.clone());
            }
            ok()
        }
        ListVerb::PopFront => vec![list.pop_front().unwrap_or_default()],
        ListVerb::PopBack => vec![list.pop_back().unwrap_or_default()],
        ListVerb::Index => cmd
            .values
            .iter()
            .map(|raw| match raw.parse::<usize>() {
                Ok(idx) => list.index(idx).unwrap_or("").to_string(),
                Err(_) => String::new(),
            })
            .collect(),
        ListVerb::Len => vec![list.len().to_string()],
        ListVerb::Rem => {
            for value in &cmd.values {
                list.rem(value);
            }
            ok()
        }
        ListVerb::Trim => {
            let (Some(begin), Some(end)) = (
                cmd.values.first().and_then(|v| v.parse::<usize>().ok()),
                cmd.values.get(1).and_then(|v| v.parse::<usize>().ok()),
            ) else {
                return nil();
            };
            list.trim(begin, end);
            ok()
        }
    }
}

fn exec_hash(cmd: &HashCommand, db: &mut Db) -> Vec<String> {
    if !db.contains(&cmd.key) {
        if cmd.verb != HashVerb::Set {
            return nil();
        }
        db.create(cmd.key.clone(), Object::new(ObjectType::Hash));
    }
    let Some(hash) = db.get_mut(&cmd.key).and_then(Object::as_hash_mut) else {
        return nil();
    };

    match cmd.verb {
        HashVerb::Set => {
            for pair in cmd.values.chunks(2) {
                if let [field, value] = pair {
                    hash.set(field.clone(), value.clone());
                }
            }
            ok()
        }
        HashVerb::Get => cmd
            .values
            .iter()
            .map(|field| hash.get(field).unwrap_or("").to_string())
            .collect(),
        HashVerb::Exist => cmd
            .values
            .iter()
            .map(|field| {
                if hash.exists(field) {
                    "Exist".to_string()
                } else {
                    "NotExist".to_string()
                }
            })
            .collect(),
        HashVerb::Del => {
            for field in &cmd.values {
                hash.del(field);
            }
            ok()
        }
        HashVerb::Len => vec![hash.len().to_string()],
        HashVerb::GetAll => hash
            .get_all()
            .into_iter()
            .flat_map(|(field, value)| [field.to_string(), value.to_string()])
            .collect(),
        HashVerb::IncrBy | HashVerb::DecrBy => {
            // All deltas are validated before any field is touched.
            let mut pairs = Vec::new();
            for pair in cmd.values.chunks(2) {
                let [field, delta] = pair else { continue };
                let Ok(delta) = delta.parse::<u64>() else {
                    return failed();
                };
                pairs.push((field, delta));
            }
            let mut applied = true;
            for (field, delta) in pairs {
                let done = match cmd.verb {
                    HashVerb::IncrBy => hash.incr_by(field, delta),
                    _ => hash.decr_by(field, delta),
                };
                applied &= done;
            }
            if applied {
                ok()
            } else {
                failed()
            }
        }
    }
}

fn exec_set(cmd: &SetCommand, db: &mut Db) -> Vec<String> {
    if !db.contains(&cmd.key) {
        if cmd.verb != SetVerb::Add {
            return nil();
        }
        db.create(cmd.key.clone(), Object::new(ObjectType::Set));
    }

    match cmd.verb {
        SetVerb::Add | SetVerb::Rem | SetVerb::Pop => {
            let Some(set) = db.get_mut(&cmd.key).and_then(Object::as_set_mut) else {
                return nil();
            };
            match cmd.verb {
                SetVerb::Add => {
                    for member in &cmd.values {
                        set.add(member.clone());
                    }
                    ok()
                }
                SetVerb::Rem => {
                    for member in &cmd.values {
                        set.rem(member);
                    }
                    ok()
                }
                _ => vec![set.pop().unwrap_or_default()],
            }
        }
        _ => {
            let Some(set) = db.get(&cmd.key).and_then(Object::as_set) else {
                return nil();
            };
            match cmd.verb {
                SetVerb::Card => vec![set.card().to_string()],
                SetVerb::IsMember => cmd
                    .values
                    .iter()
                    .map(|member| {
                        if set.is_member(member) {
                            "IsMember".to_string()
                        } else {
                            "IsNotMember".to_string()
                        }
                    })
                    .collect(),
                SetVerb::Members => set.members(),
                SetVerb::RandMember => vec![set.rand_member().unwrap_or("").to_string()],
                SetVerb::Inter | SetVerb::Diff => {
                    // The other operand is resolved from the same keyspace; a
                    // missing key or another type soft-fails.
                    let Some(other) = cmd
                        .values
                        .first()
                        .and_then(|name| db.get(name))
                        .and_then(Object::as_set)
                    else {
                        return nil();
                    };
                    if cmd.verb == SetVerb::Inter {
                        set.inter(other)
                    } else {
                        set.diff(other)
                    }
                }
                SetVerb::Add | SetVerb::Rem | SetVerb::Pop => unreachable!("handled above"),
            }
        }
    }
}

fn exec_zset(cmd: &ZSetCommand, db: &mut Db) -> Vec<String> {
    let mutating = matches!(
        cmd.verb,
        ZSetVerb::Add | ZSetVerb::Rem | ZSetVerb::IncrBy | ZSetVerb::DecrBy
    );
    // Scores are validated up front so a malformed batch neither creates the
    // key nor mutates it halfway through.
    let pairs = if mutating {
        match score_pairs(&cmd.values) {
            Some(pairs) => pairs,
            None => return nil(),
        }
    } else {
        Vec::new()
    };

    if !db.contains(&cmd.key) {
        if cmd.verb != ZSetVerb::Add {
            return nil();
        }
        db.create(cmd.key.clone(), Object::new(ObjectType::ZSet));
    }

    match cmd.verb {
        ZSetVerb::Add | ZSetVerb::Rem | ZSetVerb::IncrBy | ZSetVerb::DecrBy => {
            let Some(zset) = db.get_mut(&cmd.key).and_then(Object::as_zset_mut) else {
                return nil();
            };
            for (score, member) in pairs {
                match cmd.verb {
                    ZSetVerb::Add => zset.add(score, member),
                    ZSetVerb::Rem => {
                        zset.rem(score, &member);
                    }
                    ZSetVerb::IncrBy => zset.incr_by(score, &member),
                    _ => zset.decr_by(score, &member),
                }
            }
            ok()
        }
        _ => {
            let Some(zset) = db.get(&cmd.key).and_then(Object::as_zset) else {
                return nil();
            };
            match cmd.verb {
                ZSetVerb::Card => vec![zset.card().to_string()],
                ZSetVerb::Count => {
                    let Some((lo, hi)) = int_bounds(&cmd.values) else {
                        return nil();
                    };
                    vec![zset.count(lo, hi).to_string()]
                }
                ZSetVerb::LexCount => {
                    let (Some(lo), Some(hi)) = (cmd.values.first(), cmd.values.get(1)) else {
                        return nil();
                    };
                    vec![zset.lex_count(lo, hi).to_string()]
                }
                ZSetVerb::Range => {
                    let Some((lo, hi)) = int_bounds(&cmd.values) else {
                        return nil();
                    };
                    let lo = lo.max(0) as usize;
                    let hi = hi.max(0) as usize;
                    flatten(zset.range(lo, hi))
                }
                ZSetVerb::RangeByScore => {
                    let Some((lo, hi)) = int_bounds(&cmd.values) else {
                        return nil();
                    };
                    flatten(zset.range_by_score(lo, hi))
                }
                ZSetVerb::RangeByLex => {
                    let (Some(lo), Some(hi)) = (cmd.values.first(), cmd.values.get(1)) else {
                        return nil();
                    };
                    flatten(zset.range_by_lex(lo, hi))
                }
                _ => unreachable!("mutating verbs handled above"),
            }
        }
    }
}

/// Decodes `[score, member, score, member, ...]`, refusing the whole batch on
/// any malformed score.
fn score_pairs(values: &[String]) -> Option<Vec<(i64, String)>> {
    let mut pairs = Vec::with_capacity(values.len() / 2);
    for pair in values.chunks(2) {
        let [score, member] = pair else {
            return None;
        };
        pairs.push((score.parse::<i64>().ok()?, member.clone()));
    }
    Some(pairs)
}

/// The first two values parsed as integer bounds.
fn int_bounds(values: &[String]) -> Option<(i64, i64)> {
    let lo = values.first()?.parse().ok()?;
    let hi = values.get(1)?.parse().ok()?;
    Some((lo, hi))
}

/// Flattens `(member, score)` pairs into the wire shape.
fn flatten(pairs: Vec<(String, i64)>) -> Vec<String> {
    pairs
        .into_iter()
        .flat_map(|(member, score)| [member, score.to_string()])
        .collect()
}
