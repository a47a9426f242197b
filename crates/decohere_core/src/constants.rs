//! Constants for Decohere
//!
//! Gantree: L0_Foundation → Constants
//!
//! Operation names of the stim circuit dialect and numeric defaults shared
//! by the noise and decoding crates.

// ============================================================================
// Operation Names
// Gantree: names // 연산 이름
// ============================================================================

pub mod names {
    //! Operation names as they appear in stim circuit text

    /// Time-boundary marker separating layers
    /// Gantree: TICK: &str = "TICK"
    pub const TICK: &str = "TICK";

    /// Single-qubit Pauli channel with disjoint (pX, pY, pZ) arguments
    /// Gantree: PAULI_CHANNEL_1: &str // 삽입되는 노이즈 채널
    pub const PAULI_CHANNEL_1: &str = "PAULI_CHANNEL_1";

    /// Detector declaration
    pub const DETECTOR: &str = "DETECTOR";

    /// Logical observable declaration
    pub const OBSERVABLE_INCLUDE: &str = "OBSERVABLE_INCLUDE";

    /// Qubit coordinate annotation
    pub const QUBIT_COORDS: &str = "QUBIT_COORDS";

    /// Coordinate offset annotation
    pub const SHIFT_COORDS: &str = "SHIFT_COORDS";

    /// Repeat block keyword (flattened on parse)
    pub const REPEAT: &str = "REPEAT";

    /// Annotations: passed through without consuming qubit time
    /// Gantree: ANNOTATIONS: [&str] // TICK 제외 주석
    pub const ANNOTATIONS: &[&str] = &[
        DETECTOR,
        OBSERVABLE_INCLUDE,
        QUBIT_COORDS,
        SHIFT_COORDS,
    ];

    /// Measurement operations (including measure-resets)
    /// Gantree: MEASUREMENTS: [&str] // 측정
    pub const MEASUREMENTS: &[&str] = &["M", "MZ", "MX", "MY", "MR", "MRZ", "MRX", "MRY"];

    /// Reset operations (including measure-resets)
    pub const RESETS: &[&str] = &["R", "RZ", "RX", "RY", "MR", "MRZ", "MRX", "MRY"];

    /// Stochastic noise operations
    /// Gantree: STOCHASTIC: [&str] // 노이즈 연산
    pub const STOCHASTIC: &[&str] = &[
        PAULI_CHANNEL_1,
        "PAULI_CHANNEL_2",
        "X_ERROR",
        "Y_ERROR",
        "Z_ERROR",
        "DEPOLARIZE1",
        "DEPOLARIZE2",
        "E",
        "CORRELATED_ERROR",
        "ELSE_CORRELATED_ERROR",
    ];

    /// Single-qubit Clifford gates understood by the error analyzer
    pub const SINGLE_QUBIT_GATES: &[&str] = &[
        "I", "X", "Y", "Z", "H", "S", "S_DAG", "SQRT_X", "SQRT_X_DAG", "SQRT_Y", "SQRT_Y_DAG",
    ];

    /// Two-qubit Clifford gates understood by the error analyzer
    pub const TWO_QUBIT_GATES: &[&str] = &["CX", "CNOT", "CY", "CZ", "SWAP"];
}

// ============================================================================
// Matching Constants
// Gantree: matching // 디코더 상수
// ============================================================================

pub mod matching {
    //! Numeric constants of the matching decoder

    /// Integer resolution of edge weights handed to the blossom solver
    /// Gantree: WEIGHT_RESOLUTION: f64 = 1000.0
    pub const WEIGHT_RESOLUTION: f64 = 1000.0;

    /// Smallest integer edge weight (the solver requires even weights)
    pub const MIN_INTEGER_WEIGHT: isize = 2;

    /// Probabilities below this are treated as impossible edges
    pub const MIN_EDGE_PROBABILITY: f64 = 1e-15;
}

// ============================================================================
// Tests
// ============================================================================
