//! Common Bluespec sources for tests.

pub const COUNTER_PACKAGE: &str = r#"package Counter;

import FIFO::*;

export Counter(..), mkCounter;

interface Counter;
   method UInt#(8) read();
   method Action increment(UInt#(8) by);
endinterface

typedef enum { Idle, Busy } State deriving (Bits, Eq);

typedef struct {
   UInt#(8) count;
   Bool valid;
} Entry deriving (Bits);

(* synthesize *)
module mkCounter(Counter);
   Reg#(UInt#(8)) value <- mkReg(0);
   Reg#(State) state <- mkReg(Idle);

   // Count while busy.
   rule tick (state == Busy);
      value <= value + 1;
      if (value == 255)
         state <= Idle;
      else begin
         $display("value = %d", value);
      end
   endrule

   method UInt#(8) read();
      return value;
   endmethod

   method Action increment(UInt#(8) by) if (state == Idle);
      value <= value + by;
      state <= Busy;
   endmethod
endmodule: mkCounter

function Bool isMax(UInt#(8) x);
   return x == 255;
endfunction

endpackage: Counter
"#;

pub const TESTBENCH: &str = r#"import Counter::*;

/* Drives the counter
   and stops after a while. */
module mkTb();
   Counter counter <- mkCounter;
   Reg#(Bit#(16)) cycle <- mkReg(0);
   Bit#(8) mask = 8'hF0;

   rule run;
      cycle <= cycle + 1;
      let current = counter.read();
      if (cycle[3:0] == 0 && current != 0)
         counter.increment(current & mask);
      if (cycle > 100) begin
         $display("done at %0d", $time);
         $finish(0);
      end
   endrule
endmodule
"#;

/// Calc sources covering blocks, precedence and nesting
pub const CALC_SOURCES: &[&str] = &[
    "",
    "x",
    "x + 1",
    "a - b - c",
    "a + b * c",
    "{ a } { b } { c } x",
    "{ { a + b } c * 2 } d",
    "one two three",
];

/// Calc sources with unparseable bytes next to complete expressions
pub const CALC_ERROR_SOURCES: &[&str] = &[
    "x+e; ed",
    "a + b ; c d",
    "{ a ; b } c",
    "x ; y z",
    "a # b + c",
    "{ a + } b",
    "x + ; + y",
    "} a b {",
];
