pub mod cli_consts {
    //! Client Constants

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// How often the dashboard redraws and polls for key presses (milliseconds).
    pub const UI_TICK_MS: u64 = 100;
}
