//! Diesel table definitions for the Postgres-backed store (C3). Column
//! types follow the entity field lists in spec §3; JSON payloads (account
//! tail, operation content) are stored as `jsonb` and decoded through serde
//! rather than being split across per-variant tables, since the tagged
//! unions (`Account`, `OperationContent`) already give a stable shape.

diesel::table! {
    app_state (id) {
        id -> Integer,
        level -> Integer,
        hash -> Text,
        protocol_code -> Integer,
        timestamp -> Timestamptz,
        next_operation_id -> Bigint,
        next_account_id -> Bigint,
        manager_counter -> Bigint,
        known_head -> Integer,
    }
}

diesel::table! {
    protocols (hash) {
        hash -> Text,
        code -> Integer,
        first_level -> Integer,
        last_level -> Nullable<Integer>,
        constants -> Jsonb,
    }
}

diesel::table! {
    accounts (id) {
        id -> Bigint,
        address -> Text,
        kind -> Text,
        first_level -> Integer,
        last_level -> Integer,
        balance -> Bigint,
        counter -> Bigint,
        data -> Jsonb,
    }
}

diesel::table! {
    blocks (level) {
        level -> Integer,
        hash -> Text,
        predecessor -> Text,
        timestamp -> Timestamptz,
        protocol_code -> Integer,
        baker_id -> Bigint,
        priority -> Integer,
        validation_passes -> Integer,
        reward -> Bigint,
        fees -> Bigint,
        deposit -> Bigint,
        operations_bitmask -> Integer,
        lb_escape_vote -> Nullable<Bool>,
        lb_escape_ema -> Nullable<Bigint>,
    }
}

diesel::table! {
    operations (id) {
        id -> Bigint,
        level -> Integer,
        timestamp -> Timestamptz,
        op_hash -> Text,
        sender_id -> Bigint,
        status -> Text,
        kind -> Text,
        errors -> Nullable<Text>,
        content -> Jsonb,
    }
}

diesel::table! {
    voting_periods (index) {
        index -> Integer,
        epoch -> Integer,
        kind -> Text,
        first_level -> Integer,
        last_level -> Integer,
        status -> Text,
        top_upvotes -> Bigint,
        top_rolls -> Bigint,
        proposals_count -> Integer,
        ballot_quorum -> Nullable<Bigint>,
        participation_ema -> Nullable<Bigint>,
        total_rolls -> Bigint,
        yay_rolls -> Bigint,
        nay_rolls -> Bigint,
        pass_rolls -> Bigint,
    }
}

diesel::table! {
    proposals (id) {
        id -> Bigint,
        hash -> Text,
        epoch -> Integer,
        first_period -> Integer,
        last_period -> Integer,
        initiator_id -> Bigint,
        upvotes -> Bigint,
        rolls -> Bigint,
        status -> Text,
    }
}

diesel::table! {
    voting_snapshots (period, baker_id) {
        period -> Integer,
        baker_id -> Bigint,
        rolls -> Bigint,
        status -> Text,
    }
}

diesel::table! {
    cycles (index) {
        index -> Integer,
        snapshot_level -> Integer,
        snapshot_index -> Integer,
        total_rolls -> Bigint,
        total_staking -> Bigint,
        selected_bakers -> Jsonb,
        seed -> Text,
    }
}

diesel::table! {
    baking_rights (cycle, level, baker_id) {
        cycle -> Integer,
        level -> Integer,
        baker_id -> Bigint,
        priority -> Integer,
        status -> Text,
    }
}

diesel::table! {
    endorsing_rights (cycle, level, baker_id) {
        cycle -> Integer,
        level -> Integer,
        baker_id -> Bigint,
        slot -> Integer,
        status -> Text,
    }
}

diesel::table! {
    quotes (level) {
        level -> Integer,
        btc -> Double,
        eur -> Double,
        usd -> Double,
        cny -> Double,
        jpy -> Double,
        krw -> Double,
        eth -> Double,
        gbp -> Double,
    }
}
