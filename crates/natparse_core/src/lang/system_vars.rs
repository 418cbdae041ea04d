//! Define the system variable and system function spellings of Natural.
//!
//! System variables and functions are prefixed with `*` (`*DATX`, `*OCC`, `*TIMD`). This registry maps every
//! spelling to a stable [`SystemVarId`] and records the syntax-kind name tooling uses to refer to it (`SV_DATX`).
//! Result types, mutability and parameter signatures live in [`crate::lang::builtins`].
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-insensitive** and expects the full spelling including the `*`.
//! - Several names are prefixes of others (`*DAT4E`/`*DATE`, `*LINE`/`*LINE-COUNT`/`*LINEX`, `*OCC`/`*OCCURRENCE`).
//!   The lexer is responsible for longest-match; this registry only answers exact lookups.
//!
//! ## Examples
//! ```rust
//! use natparse_core::lang::system_vars::{self, SystemVarId};
//!
//! assert_eq!(system_vars::from_str("*timX"), Some(SystemVarId::Timx));
//! assert_eq!(system_vars::kind_name(SystemVarId::Timx), "SV_TIMX");
//! assert_eq!(system_vars::kind_name(SystemVarId::Trim), "TRIM");
//! ```

/// Stable identifier for every system variable and system function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemVarId {
    ApplicId,
    ApplicName,
    InitId,
    Time,
    Timx,
    Timestmp,
    Timestmpx,
    TimeOut,
    Timn,
    Timd,
    Datd,
    Date,
    Dat4e,
    Datg,
    Dat4d,
    Dati,
    Dat4i,
    Datj,
    Dat4j,
    Datx,
    Datn,
    Datu,
    Dat4u,
    Datv,
    Datvs,
    Linesize,
    Pagesize,
    NetUser,
    ParmUser,
    Natvers,
    PatchLevel,
    Hardware,
    Hostname,
    Locale,
    MachineClass,
    Language,
    Startup,
    Steplib,
    PageNumber,
    LineCount,
    WindowLs,
    WindowPs,
    WindowPos,
    LibraryId,
    Translate,
    Number,
    Length,
    Subroutine,
    ThisObject,
    Type,
    Linex,
    LoadLibraryId,
    CurrentUnit,
    Error,
    ErrorNr,
    ErrorTa,
    Line,
    ErrorLine,
    Cursor,
    CursField,
    CursLine,
    CursCol,
    ParseCol,
    ParseRow,
    ParseLevel,
    ParseType,
    ParseIndex,
    ParseNamespaceUri,
    BrowserIo,
    Device,
    CpuTime,
    Etid,
    InitProgram,
    Lbound,
    Ubound,
    ServerType,
    Tp,
    Tpsys,
    Opsys,
    Os,
    Osvers,
    Program,
    ReinputType,
    Rowcount,
    Group,
    Hardcopy,
    UserName,
    Codepage,
    Ui,
    User,
    InitUser,
    PfKey,
    PfName,
    Pid,
    Isn,
    ScreenIo,
    Counter,
    Occurrence,
    Occ,
    PageEvent,
    PageLevel,
    Minval,
    Maxval,
    Trim,
    Com,
    Data,
    Editor,
    Level,
    Convid,
    InAttribute,
    OutAttribute,
    OutinAttribute,
}

/// Whether a spelling names a plain system variable, a function taking arguments, or an attribute marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemVarForm {
    Variable,
    Function,
    /// `*IN`, `*OUT`, `*OUTIN`: field attribute markers without a value or a builtin definition.
    Attribute,
}

/// Metadata for a system variable spelling.
#[derive(Debug, Clone, Copy)]
pub struct SystemVarInfo {
    pub id: SystemVarId,
    /// Source spelling including the leading `*`.
    pub canonical: &'static str,
    /// Syntax-kind name (`SV_DATX`, `TRIM`).
    pub kind: &'static str,
    pub form: SystemVarForm,
    pub description: &'static str,
}

/// Registry of all system variables and functions.
pub const SYSTEM_VARS: &[SystemVarInfo] = &[
    var(SystemVarId::ApplicId, "*APPLIC-ID", "SV_APPLIC_ID", "ID of the current library."),
    var(SystemVarId::ApplicName, "*APPLIC-NAME", "SV_APPLIC_NAME", "Name of the library the user is logged on to."),
    var(SystemVarId::InitId, "*INIT-ID", "SV_INIT_ID", "ID of the device that invoked Natural."),
    var(SystemVarId::Time, "*TIME", "SV_TIME", "Current time of day as A10 in format HH:II:SS.T."),
    var(SystemVarId::Timx, "*TIMX", "SV_TIMX", "Current time of day in builtin time format."),
    var(SystemVarId::Timestmp, "*TIMESTMP", "SV_TIMESTMP", "Machine-internal clock value."),
    var(SystemVarId::Timestmpx, "*TIMESTMPX", "SV_TIMESTMPX", "Extended machine-internal clock value."),
    var(SystemVarId::TimeOut, "*TIME-OUT", "SV_TIME_OUT", "Seconds remaining before the current transaction times out."),
    var(SystemVarId::Timn, "*TIMN", "SV_TIMN", "Current time of day in numeric format."),
    func(SystemVarId::Timd, "*TIMD", "SV_TIMD", "Time passed since the SET TIME statement referred to by the label."),
    var(SystemVarId::Datd, "*DATD", "SV_DATD", "Current date in format DD.MM.YY."),
    var(SystemVarId::Date, "*DATE", "SV_DATE", "Current date in format DD/MM/YY."),
    var(SystemVarId::Dat4e, "*DAT4E", "SV_DAT4E", "Current date in format DD/MM/YYYY."),
    var(SystemVarId::Datg, "*DATG", "SV_DATG", "Current date in gregorian format DDmonthnameYYYY."),
    var(SystemVarId::Dat4d, "*DAT4D", "SV_DAT4D", "Current date in format DD.MM.YYYY."),
    var(SystemVarId::Dati, "*DATI", "SV_DATI", "Current date in format YY-MM-DD."),
    var(SystemVarId::Dat4i, "*DAT4I", "SV_DAT4I", "Current date in format YYYY-MM-DD."),
    var(SystemVarId::Datj, "*DATJ", "SV_DATJ", "Current Julian date in format YYJJJ."),
    var(SystemVarId::Dat4j, "*DAT4J", "SV_DAT4J", "Current Julian date in format YYYYJJJ."),
    var(SystemVarId::Datx, "*DATX", "SV_DATX", "Current date in builtin date format."),
    var(SystemVarId::Datn, "*DATN", "SV_DATN", "Current date in format YYYYMMDD."),
    var(SystemVarId::Datu, "*DATU", "SV_DATU", "Current date in format MM/DD/YY."),
    var(SystemVarId::Dat4u, "*DAT4U", "SV_DAT4U", "Current date in format MM/DD/YYYY."),
    var(SystemVarId::Datv, "*DATV", "SV_DATV", "Current date in format DD-MON-YY."),
    var(SystemVarId::Datvs, "*DATVS", "SV_DATVS", "Current date in format DDMONYYYY."),
    var(SystemVarId::Linesize, "*LINESIZE", "SV_LINESIZE", "Physical line size of the I/O device."),
    var(SystemVarId::Pagesize, "*PAGESIZE", "SV_PAGESIZE", "Physical page size of the I/O device."),
    var(SystemVarId::NetUser, "*NET-USER", "SV_NET_USER", "User ID of the client as passed by the web server."),
    var(SystemVarId::ParmUser, "*PARM-USER", "SV_PARM_USER", "Name of the parameter file in use."),
    var(SystemVarId::Natvers, "*NATVERS", "SV_NATVERS", "Natural version."),
    var(SystemVarId::PatchLevel, "*PATCH-LEVEL", "SV_PATCH_LEVEL", "Patch level of Natural."),
    var(SystemVarId::Hardware, "*HARDWARE", "SV_HARDWARE", "Hardware platform Natural is running on."),
    var(SystemVarId::Hostname, "*HOSTNAME", "SV_HOSTNAME", "Name of the machine Natural runs on."),
    var(SystemVarId::Locale, "*LOCALE", "SV_LOCALE", "Language and country of the current locale."),
    var(SystemVarId::MachineClass, "*MACHINE-CLASS", "SV_MACHINE_CLASS", "Machine class Natural is running on."),
    var(SystemVarId::Language, "*LANGUAGE", "SV_LANGUAGE", "Language code, e.g. 1 for english."),
    var(SystemVarId::Startup, "*STARTUP", "SV_STARTUP", "Program executed instead of the command prompt."),
    var(SystemVarId::Steplib, "*STEPLIB", "SV_STEPLIB", "Name of the current steplib."),
    var(SystemVarId::PageNumber, "*PAGE-NUMBER", "SV_PAGE_NUMBER", "Current page number of a report."),
    var(SystemVarId::LineCount, "*LINE-COUNT", "SV_LINE_COUNT", "Line number of the current page's line."),
    var(SystemVarId::WindowLs, "*WINDOW-LS", "SV_WINDOW_LS", "Line size of the logical window."),
    var(SystemVarId::WindowPs, "*WINDOW-PS", "SV_WINDOW_PS", "Page size of the logical window."),
    var(SystemVarId::WindowPos, "*WINDOW-POS", "SV_WINDOW_POS", "Position of the upper left corner of the window."),
    var(SystemVarId::LibraryId, "*LIBRARY-ID", "SV_LIBRARY_ID", "ID of the current library."),
    func(SystemVarId::Translate, "*TRANSLATE", "TRANSLATE", "Converts the operand into upper or lower case."),
    var(SystemVarId::Number, "*NUMBER", "SV_NUMBER", "Number of records of a FIND or HISTOGRAM statement."),
    var(SystemVarId::Length, "*LENGTH", "SV_LENGTH", "Currently used length of a dynamic variable."),
    var(SystemVarId::Subroutine, "*SUBROUTINE", "SV_SUBROUTINE", "Name of the current external subroutine."),
    var(SystemVarId::ThisObject, "*THIS-OBJECT", "SV_THIS_OBJECT", "Handle of the currently active object."),
    var(SystemVarId::Type, "*TYPE", "SV_TYPE", "Type of the executing object."),
    var(SystemVarId::Linex, "*LINEX", "SV_LINEX", "Line number including INCLUDE nesting."),
    var(SystemVarId::LoadLibraryId, "*LOAD-LIBRARY-ID", "SV_LOAD_LIBRARY_ID", "Library the executing object was loaded from."),
    var(SystemVarId::CurrentUnit, "*CURRENT-UNIT", "SV_CURRENT_UNIT", "Name of the current executing unit."),
    var(SystemVarId::Error, "*ERROR", "SV_ERROR", "Short form of *ERROR-NR."),
    var(SystemVarId::ErrorNr, "*ERROR-NR", "SV_ERROR_NR", "Number of the error that triggered ON ERROR."),
    var(SystemVarId::ErrorTa, "*ERROR-TA", "SV_ERROR_TA", "Error transaction program."),
    var(SystemVarId::Line, "*LINE", "SV_LINE", "Line number of the statement using this variable."),
    var(SystemVarId::ErrorLine, "*ERROR-LINE", "SV_ERROR_LINE", "Line of the statement that raised an error."),
    var(SystemVarId::Cursor, "*CURSOR", "SV_CURSOR", "Cursor position at the time ENTER or a PF key was pressed."),
    var(SystemVarId::CursField, "*CURS-FIELD", "SV_CURS_FIELD", "Identification of the field the cursor is positioned in."),
    var(SystemVarId::CursLine, "*CURS-LINE", "SV_CURS_LINE", "Line the cursor is positioned on."),
    var(SystemVarId::CursCol, "*CURS-COL", "SV_CURS_COL", "Column the cursor is positioned on."),
    func(SystemVarId::ParseCol, "*PARSE-COL", "SV_PARSE_COL", "Column where the parser is currently working."),
    func(SystemVarId::ParseRow, "*PARSE-ROW", "SV_PARSE_ROW", "Row where the parser is currently working."),
    func(SystemVarId::ParseLevel, "*PARSE-LEVEL", "SV_PARSE_LEVEL", "Current nesting level when parsing XML or JSON."),
    func(SystemVarId::ParseType, "*PARSE-TYPE", "SV_PARSE_TYPE", "Syntactic type of the current XML or JSON structure."),
    func(SystemVarId::ParseIndex, "*PARSE-INDEX", "SV_PARSE_INDEX", "Element index within the JSON array being parsed."),
    func(SystemVarId::ParseNamespaceUri, "*PARSE-NAMESPACE-URI", "SV_PARSE_NAMESPACE_URI", "Namespace URI of the current XML element."),
    var(SystemVarId::BrowserIo, "*BROWSER-IO", "SV_BROWSER_IO", "Whether the application runs in a web browser."),
    var(SystemVarId::Device, "*DEVICE", "SV_DEVICE", "Type or mode of the device Natural was started from."),
    var(SystemVarId::CpuTime, "*CPU-TIME", "SV_CPU_TIME", "CPU time used by the Natural process in tenths of a second."),
    var(SystemVarId::Etid, "*ETID", "SV_ETID", "Identifier of the current user for end-of-transaction data."),
    var(SystemVarId::InitProgram, "*INIT-PROGRAM", "SV_INIT_PROGRAM", "Name of the program that invoked Natural."),
    func(SystemVarId::Lbound, "*LBOUND", "SV_LBOUND", "Lower bound of an array dimension."),
    func(SystemVarId::Ubound, "*UBOUND", "SV_UBOUND", "Upper bound of an array dimension."),
    var(SystemVarId::ServerType, "*SERVER-TYPE", "SV_SERVER_TYPE", "Server type Natural was started as."),
    var(SystemVarId::Tp, "*TP", "SV_TP", "Name of the TP subsystem."),
    var(SystemVarId::Tpsys, "*TPSYS", "SV_TPSYS", "TP monitor or environment Natural is running under."),
    var(SystemVarId::Opsys, "*OPSYS", "SV_OPSYS", "Operating system Natural is running under."),
    var(SystemVarId::Os, "*OS", "SV_OS", "Name of the operating system."),
    var(SystemVarId::Osvers, "*OSVERS", "SV_OSVERS", "Version of the operating system."),
    var(SystemVarId::Program, "*PROGRAM", "SV_PROGRAM", "Name of the current Natural object."),
    var(SystemVarId::ReinputType, "*REINPUT-TYPE", "SV_REINPUT_TYPE", "Whether the current input is a REINPUT."),
    var(SystemVarId::Rowcount, "*ROWCOUNT", "SV_ROWCOUNT", "Rows affected by the last SQL statement."),
    var(SystemVarId::Group, "*GROUP", "SV_GROUP", "Group ID taken from Natural Security logon."),
    var(SystemVarId::Hardcopy, "*HARDCOPY", "SV_HARDCOPY", "Hardcopy device used for the %H command."),
    var(SystemVarId::UserName, "*USER-NAME", "SV_USER_NAME", "User name taken from Natural Security."),
    var(SystemVarId::Codepage, "*CODEPAGE", "SV_CODEPAGE", "IANA name of the default code page."),
    var(SystemVarId::Ui, "*UI", "SV_UI", "Type of user interface (CHARACTER or GUI)."),
    var(SystemVarId::User, "*USER", "SV_USER", "User ID taken from Natural Security."),
    var(SystemVarId::InitUser, "*INIT-USER", "SV_INIT_USER", "Value of the profile parameter USER."),
    var(SystemVarId::PfKey, "*PF-KEY", "SV_PF_KEY", "Identification of the last key pressed."),
    var(SystemVarId::PfName, "*PF-NAME", "SV_PF_NAME", "Name of the last function key pressed."),
    var(SystemVarId::Pid, "*PID", "SV_PID", "Current process ID as a string."),
    func(SystemVarId::Isn, "*ISN", "SV_ISN", "Internal sequence number of the current record."),
    var(SystemVarId::ScreenIo, "*SCREEN-IO", "SV_SCREEN_IO", "Whether screen I/O is currently possible."),
    func(SystemVarId::Counter, "*COUNTER", "SV_COUNTER", "Number of times a database loop was entered."),
    func(SystemVarId::Occurrence, "*OCCURRENCE", "SV_OCCURRENCE", "Number of occurrences of an array dimension."),
    func(SystemVarId::Occ, "*OCC", "SV_OCC", "Number of occurrences of an array dimension."),
    var(SystemVarId::PageEvent, "*PAGE-EVENT", "SV_PAGE_EVENT", "Name of the current page event."),
    var(SystemVarId::PageLevel, "*PAGE-LEVEL", "SV_PAGE_LEVEL", "Level of the current page event."),
    func(SystemVarId::Minval, "*MINVAL", "MINVAL", "Minimum value of all operands."),
    func(SystemVarId::Maxval, "*MAXVAL", "MAXVAL", "Maximum value of all operands."),
    func(SystemVarId::Trim, "*TRIM", "TRIM", "Removes leading and trailing blanks."),
    var(SystemVarId::Com, "*COM", "SV_COM", "Communication area for window input."),
    var(SystemVarId::Data, "*DATA", "SV_DATA", "Number of elements in the Natural stack."),
    var(SystemVarId::Editor, "*EDITOR", "SV_EDITOR", "Whether the Natural editor is available."),
    var(SystemVarId::Level, "*LEVEL", "SV_LEVEL", "Level of the currently executing object."),
    var(SystemVarId::Convid, "*CONVID", "SV_CONVID", "Conversation ID for remote procedure calls."),
    attribute(SystemVarId::InAttribute, "*IN", "IN_ATTRIBUTE", "Input field attribute."),
    attribute(SystemVarId::OutAttribute, "*OUT", "OUT_ATTRIBUTE", "Output field attribute."),
    attribute(SystemVarId::OutinAttribute, "*OUTIN", "OUTIN_ATTRIBUTE", "Input and output field attribute."),
];

/// Canonical spelling, including the `*`.
pub fn as_str(id: SystemVarId) -> &'static str {
    info_for(id).canonical
}

/// Syntax-kind name.
pub fn kind_name(id: SystemVarId) -> &'static str {
    info_for(id).kind
}

/// Return `true` if the spelling names a function that takes arguments.
pub fn is_function(id: SystemVarId) -> bool {
    info_for(id).form == SystemVarForm::Function
}

/// Return `true` for the attribute markers, which have no builtin definition.
pub fn is_attribute(id: SystemVarId) -> bool {
    info_for(id).form == SystemVarForm::Attribute
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: SystemVarId) -> &'static SystemVarInfo {
    SYSTEM_VARS.iter().find(|s| s.id == id).expect("system variable info missing")
}

/// Lookup by full spelling (`*DATX`), ignoring ASCII case.
pub fn from_str(s: &str) -> Option<SystemVarId> {
    SYSTEM_VARS
        .iter()
        .find(|s_info| s_info.canonical.eq_ignore_ascii_case(s))
        .map(|s_info| s_info.id)
}

/// Length in bytes of the longest registered spelling.
pub fn max_spelling_len() -> usize {
    SYSTEM_VARS.iter().map(|s| s.canonical.len()).max().unwrap_or(0)
}

// --- helpers -----------------------------------------------------------------

const fn var(id: SystemVarId, canonical: &'static str, kind: &'static str, description: &'static str) -> SystemVarInfo {
    SystemVarInfo {
        id,
        canonical,
        kind,
        form: SystemVarForm::Variable,
        description,
    }
}

const fn func(id: SystemVarId, canonical: &'static str, kind: &'static str, description: &'static str) -> SystemVarInfo {
    SystemVarInfo {
        id,
        canonical,
        kind,
        form: SystemVarForm::Function,
        description,
    }
}

const fn attribute(
    id: SystemVarId,
    canonical: &'static str,
    kind: &'static str,
    description: &'static str,
) -> SystemVarInfo {
    SystemVarInfo {
        id,
        canonical,
        kind,
        form: SystemVarForm::Attribute,
        description,
    }
}
