// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures and sample SQL scripts

/// Sample SQL scripts for testing
pub struct SqlFixtures;

impl SqlFixtures {
    // ===== Generic =====

    /// Two plain statements
    pub const fn two_selects() -> &'static str {
        "SELECT a FROM t; SELECT b FROM u;"
    }

    /// Script divided by `@block` markers
    pub const fn blocks() -> &'static str {
        "-- @block Users
SELECT * FROM users;
SELECT count(*) FROM users;

-- @block Orders
SELECT * FROM orders WHERE note = '-- @block not a marker';
"
    }

    // ===== PostgreSQL =====

    /// Function body with semicolons inside a dollar quote
    pub const fn pg_function() -> &'static str {
        "create function foo() returns void as $$
begin
  insert into log values ('a;b');
  perform pg_sleep(1);
end;
$$ language plpgsql;
select foo();"
    }

    /// Tagged dollar quote containing an untagged one
    pub const fn pg_tagged_function() -> &'static str {
        "CREATE FUNCTION f() RETURNS text AS $body$
  SELECT $$;$$;
$body$ LANGUAGE sql;
SELECT f();"
    }

    // ===== SQL Server =====

    /// Batches separated by `GO`
    pub const fn mssql_batches() -> &'static str {
        "CREATE TABLE #tmp (id INT)
GO
INSERT INTO #tmp VALUES (1)
go  
SELECT * FROM [weird;name]"
    }

    // ===== MySQL =====

    /// Backslash escapes, hash comments and backticks
    pub const fn mysql_mixed() -> &'static str {
        "SELECT 'it\\'s; fine' FROM `a;b`; # hash ; comment
SELECT 2"
    }

    /// A larger script for benchmarks
    pub fn large_script(statements: usize) -> String {
        let mut script = String::new();
        for i in 0..statements {
            script.push_str(&format!(
                "-- statement {i}\nSELECT id, 'value;{i}' AS v /* c; */ FROM t{i} WHERE x = {i};\n"
            ));
        }
        script
    }
}
