//! Lua scripts for the compound backend operations.
//!
//! Redis runs a script without interleaving other commands, which makes each
//! check-and-write sequence atomic.
//!
//! The last argument is `1` when the client is retrying after an I/O error.
//! The earlier call may already have been applied with its reply lost, so in
//! that case the state it leaves behind is reported as success.

/// KEYS[1] pending key, KEYS[2] verified set;
/// ARGV[1] code, ARGV[2] member, ARGV[3] replay flag.
/// Returns 0 written, 1 key exists, 2 already a member.
pub(crate) const CONDITIONAL_SET: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    if ARGV[3] == '1' and redis.call('GET', KEYS[1]) == ARGV[1] then
        return 0
    end
    return 1
end
if redis.call('SISMEMBER', KEYS[2], ARGV[2]) == 1 then
    return 2
end
redis.call('SET', KEYS[1], ARGV[1])
return 0
"#;

/// KEYS[1] pending key, KEYS[2] verified set;
/// ARGV[1] expected code, ARGV[2] member, ARGV[3] replay flag.
/// Returns 0 promoted, 1 missing, 2 mismatch.
pub(crate) const TAKE_AND_PROMOTE: &str = r#"
local stored = redis.call('GET', KEYS[1])
if not stored then
    if ARGV[3] == '1' and redis.call('SISMEMBER', KEYS[2], ARGV[2]) == 1 then
        return 0
    end
    return 1
end
if stored ~= ARGV[1] then
    return 2
end
redis.call('DEL', KEYS[1])
redis.call('SADD', KEYS[2], ARGV[2])
return 0
"#;
