///////////////////////////////////////////////////////////////////////
// Reports
///////////////////////////////////////////////////////////////////////

table! {
    reports (rowid) {
        rowid -> BigInt,
        id -> Text,
        lat -> Double,
        lng -> Double,
        status -> SmallInt,
        note -> Nullable<Text>,
        owner_id -> Nullable<Text>,
        created_at -> BigInt,
        expires_at -> BigInt,
        rating_total -> BigInt,
        rating_sum -> BigInt,
        is_active -> Bool,
    }
}

table! {
    report_ratings (rowid) {
        rowid -> BigInt,
        id -> Text,
        report_rowid -> BigInt,
        rater_id -> Text,
        value -> SmallInt,
        created_at -> BigInt,
    }
}

joinable!(report_ratings -> reports (report_rowid));

///////////////////////////////////////////////////////////////////////
// Favorites
///////////////////////////////////////////////////////////////////////

table! {
    favorites (user_id, report_rowid) {
        user_id -> Text,
        report_rowid -> BigInt,
        created_at -> BigInt,
    }
}

joinable!(favorites -> reports (report_rowid));

allow_tables_to_appear_in_same_query!(favorites, report_ratings, reports);
