use crate::model::overtime::{
    FailureResponse, OvertimeEntry, RowSummary, SubmitResponse, TotalsQuery, TotalsResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Overtime Tracker API",
        version = "0.1.0",
        description = r#"
## Overtime Tracker

Records employee overtime entries in an append-only record table and
recomputes per-agent totals on demand.

### 🔹 Operations
- **Submit entry**
  - Validates agent, date and a same-day start/end time, then appends one row
- **Totals**
  - Reads every stored row, keeps the agent's rows and sums their durations

### 📦 Response Format
- Every response carries `success`
- Failures add `error` (the error kind) and a human readable `message`

### 🗄️ Storage
Rows live in a Google Sheets worksheet by default; MySQL and an in-memory
table are available for other deployments.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::overtime::submit_entry,
        crate::api::overtime::get_totals,
    ),
    components(
        schemas(
            OvertimeEntry,
            SubmitResponse,
            TotalsQuery,
            TotalsResponse,
            RowSummary,
            FailureResponse
        )
    ),
    tags(
        (name = "Overtime", description = "Overtime entry and totals APIs"),
    )
)]
pub struct ApiDoc;
