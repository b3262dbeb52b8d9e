//! End-to-end transform tests.
//!
//! Exercises the full pipeline through [`brrr_scrub::transform`] on realistic
//! migrated scripts: direct usage, aliases, cascades, control flow and
//! formatting of the emitted comments.

use brrr_scrub::{transform, LineRange, ParseTier, ScrubConfig, Scrubber};

// ============================================================================
// HELPERS
// ============================================================================

/// The line must appear wrapped as a single-line comment.
fn assert_commented(output: &str, line: &str) {
    let wrapped = format!("/* {} */", line);
    assert!(
        output.lines().any(|l| l == wrapped),
        "expected `{}` to be commented. Full output:\n{}",
        line,
        output,
    );
}

/// The line must appear as-is, outside any single-line comment.
fn assert_untouched(output: &str, line: &str) {
    assert!(
        output.lines().any(|l| l == line),
        "expected `{}` to be untouched. Full output:\n{}",
        line,
        output,
    );
}

/// A multi-line block starting with `first` and ending with `last`.
fn assert_block(output: &str, first: &str, last: &str) {
    let opening = format!("/*\n{}\n", first);
    let closing = format!("\n{}\n*/", last);
    let start = output
        .find(&opening)
        .unwrap_or_else(|| panic!("no block opens at `{}`. Full output:\n{}", first, output));
    assert!(
        output[start..].contains(&closing),
        "block at `{}` does not close after `{}`. Full output:\n{}",
        first,
        last,
        output,
    );
}

// ============================================================================
// DIRECT USAGE
// ============================================================================

#[test]
fn single_line_statement_is_wrapped() {
    let input = "pm.test('random test', () => postman.variables.replaceIn('{{$guid}}'));";
    assert_eq!(
        transform(input),
        "/* pm.test('random test', () => postman.variables.replaceIn('{{$guid}}')); */"
    );
}

#[test]
fn derived_values_are_wrapped_line_by_line() {
    let input = r#"
      pm.sendRequest({});
      const data = pm.response.json();
      const country = data.country
      console.log(country.name)
    "#;
    let expected = r#"
/*       pm.sendRequest({}); */
/*       const data = pm.response.json(); */
/*       const country = data.country */
/*       console.log(country.name) */
    "#;
    assert_eq!(transform(input), expected);
}

#[test]
fn multi_line_statement_keeps_interior_bytes() {
    let input = r#"
    pm.sendRequest({
    url: "https://jsonplaceholder.typicode.com/posts/1",
    method: "GET",
    header: {
        "Content-Type": "application/json"
    }
    }, function (err, res) {
    if (err) {
        console.log("Request Error:", err);
    } else {
        console.log("Dynamic Request Status:", res.code);
        postman.environment.set("response_data", res.json());
    }
    });
    "#;
    let expected = r#"
/*
    pm.sendRequest({
    url: "https://jsonplaceholder.typicode.com/posts/1",
    method: "GET",
    header: {
        "Content-Type": "application/json"
    }
    }, function (err, res) {
    if (err) {
        console.log("Request Error:", err);
    } else {
        console.log("Dynamic Request Status:", res.code);
        postman.environment.set("response_data", res.json());
    }
    });
*/
    "#;
    assert_eq!(transform(input), expected);
}

#[test]
fn top_level_await_declaration() {
    let input = r#"
    const response = await pm.sendRequest({
    url: "https://jsonplaceholder.typicode.com/posts/1",
    method: "GET"
    }, function (err, res) {
        if (err) {
            console.log("Request Error:", err);
        } else {
            pm.environment.set("response_data", res.json());
        }
    });
"#;
    let expected = r#"
/*
    const response = await pm.sendRequest({
    url: "https://jsonplaceholder.typicode.com/posts/1",
    method: "GET"
    }, function (err, res) {
        if (err) {
            console.log("Request Error:", err);
        } else {
            pm.environment.set("response_data", res.json());
        }
    });
*/
"#;
    assert_eq!(transform(input), expected);
}

#[test]
fn mixed_script_only_touches_dependent_statements() {
    let input = r#"
    const acorn = require("acorn");
    console.log('Start of script');
    res



    .untranslatedStatus.open({
    hello: "there"
    })

    ;
    pm.untranslatedCode;
    pm
    .environment.get('key'


    );
    pm
    .collectionVariables
    .get('key')
    const bruno = "bruno is a good boy"
    pm.collectionVariables.set('key', 'value');
    const pmx = pm;
    const status = pmx.untranslatedStatus;
    const derived = status.derivedUnknown;
    const pmxx = pmx;
    const status__ = pmxx.untranslatedStatus;
    console.log('End of script');
    const goldy = "Golden Era"
    postman.getEnvironmentVariable('key');
    pm.test("Check response", function() {
        console.log("Running test");
    });
"#;
    let expected = r#"
    const acorn = require("acorn");
    console.log('Start of script');
    res



    .untranslatedStatus.open({
    hello: "there"
    })

    ;
/*     pm.untranslatedCode; */
/*
    pm
    .environment.get('key'


    );
*/
/*
    pm
    .collectionVariables
    .get('key')
*/
    const bruno = "bruno is a good boy"
/*     pm.collectionVariables.set('key', 'value'); */
/*     const pmx = pm; */
/*     const status = pmx.untranslatedStatus; */
/*     const derived = status.derivedUnknown; */
/*     const pmxx = pmx; */
/*     const status__ = pmxx.untranslatedStatus; */
    console.log('End of script');
    const goldy = "Golden Era"
/*     postman.getEnvironmentVariable('key'); */
/*
    pm.test("Check response", function() {
        console.log("Running test");
    });
*/
"#;
    assert_eq!(transform(input), expected);
}

#[test]
fn property_access_without_call_is_wrapped() {
    let output = transform("const value = 'test';\npm.untranslatedStatus;\npm.untranslatedCode;");
    assert_untouched(&output, "const value = 'test';");
    assert_commented(&output, "pm.untranslatedStatus;");
    assert_commented(&output, "pm.untranslatedCode;");
}

#[test]
fn references_inside_object_literals() {
    let input = r#"
      const sampleObjects = [
        {
          key: pm.unknownFn.get('key'),
        },
      ];
    "#;
    assert_block(&transform(input), "      const sampleObjects = [", "      ];");
}

// ============================================================================
// NO-OP GUARANTEES
// ============================================================================

#[test]
fn clean_script_is_returned_verbatim() {
    let input = "\n      console.log(\"This is a regular script.\");\n    ";
    assert_eq!(transform(input), input);
}

#[test]
fn mentions_in_strings_and_property_names_are_not_references() {
    let input = r#"function logMessage() {
  console.log("This mentions pm but doesn't use it");
  return config.pm + { postman: 1 }.postman;
}
const message = logMessage();
"#;
    assert_eq!(transform(input), input);
}

#[test]
fn existing_line_comments_are_not_wrapped() {
    let input = "const value = 'test';\n// pm.untranslatedStatus;\npm.untranslatedCode;\n";
    assert_eq!(
        transform(input),
        "const value = 'test';\n// pm.untranslatedStatus;\n/* pm.untranslatedCode; */\n"
    );
}

#[test]
fn crlf_line_endings_are_preserved() {
    let input = "let a = 1;\r\npm.test('x');\r\nlet b = 2;";
    assert_eq!(transform(input), "let a = 1;\r\n/* pm.test('x');\r */\nlet b = 2;");
}

// ============================================================================
// ALIASES
// ============================================================================

#[test]
fn alias_usage_far_from_declaration() {
    let input = r#"const myPm = pm;
const a = 1;
const b = a + 1;
console.log(b);
myPm.sendRequest({});
"#;
    let output = transform(input);
    assert_commented(&output, "const myPm = pm;");
    assert_untouched(&output, "const a = 1;");
    assert_untouched(&output, "const b = a + 1;");
    assert_untouched(&output, "console.log(b);");
    assert_commented(&output, "myPm.sendRequest({});");
}

#[test]
fn multi_level_chains() {
    let input = r#"
      // Level 1: direct pm reference
      const req = pm.request;
      // Level 2
      const headers = req.headers;
      // Level 3
      const contentType = headers.get('Content-Type');
      console.log('Content-Type:', contentType);
      const unrelated = 'This is unrelated';
    "#;
    let output = transform(input);
    assert_commented(&output, "      const req = pm.request;");
    assert_commented(&output, "      const headers = req.headers;");
    assert_commented(&output, "      const contentType = headers.get('Content-Type');");
    assert_commented(&output, "      console.log('Content-Type:', contentType);");
    assert_untouched(&output, "      const unrelated = 'This is unrelated';");
    assert_untouched(&output, "      // Level 1: direct pm reference");
}

#[test]
fn assignment_expressions_introduce_aliases() {
    let input = r#"let response;
const cleanVar = "clean";
response = pm.response;
env = pm.environment;
data = response.json();
console.log(data);
env.set('key', 'value');
let cleanVar2 = "still clean";
console.log(cleanVar, cleanVar2);
"#;
    let output = transform(input);
    assert_commented(&output, "response = pm.response;");
    assert_commented(&output, "env = pm.environment;");
    assert_commented(&output, "data = response.json();");
    assert_commented(&output, "console.log(data);");
    assert_commented(&output, "env.set('key', 'value');");
    assert_untouched(&output, "const cleanVar = \"clean\";");
    assert_untouched(&output, "let cleanVar2 = \"still clean\";");
    assert_untouched(&output, "console.log(cleanVar, cleanVar2);");
}

#[test]
fn chained_assignment_statement_is_wrapped() {
    let output = transform("let x, y, z;\nx = y = z = pm.environment.get('value');\nconsole.log(x, y, z);");
    assert_commented(&output, "x = y = z = pm.environment.get('value');");
    assert_commented(&output, "console.log(x, y, z);");
}

#[test]
fn destructuring_is_a_known_limitation() {
    let input = "const { request, response } = pm;\nconsole.log(request.url);\nresponse.json();";
    assert_eq!(
        transform(input),
        "/* const { request, response } = pm; */\nconsole.log(request.url);\nresponse.json();"
    );
}

// ============================================================================
// FUNCTIONS AND CASCADE
// ============================================================================

#[test]
fn callbacks_cascade_one_hop() {
    let input = r#"
      const data = pm.res.json();
      const country = data.country;
      console.log(country.name);
      const cal = "damn";
      var wow = bru.something().then((p) => {
        console.log("pm", p);
        const res = pm.response.json();
      });
      let notDirectAlias = wow.alias();
    "#;
    let expected = r#"
/*       const data = pm.res.json(); */
/*       const country = data.country; */
/*       console.log(country.name); */
      const cal = "damn";
/*
      var wow = bru.something().then((p) => {
        console.log("pm", p);
        const res = pm.response.json();
      });
*/
/*       let notDirectAlias = wow.alias(); */
    "#;
    assert_eq!(transform(input), expected);
}

#[test]
fn object_literal_methods_cascade() {
    let input = r#"
      // Object with methods using pm
      const api = {
        baseUrl: pm.environment.get('baseUrl'),
        getToken() {
          return pm.environment.get('token');
        },
        async fetch(endpoint) {
          const token = this.getToken();
          const response = await fetch(`${this.baseUrl}/${endpoint}`, {
            headers: {
              'Authorization': `Bearer ${token}`
            }
          });
          return response.json();
        }
      };

      const getStatusCode = () => {
        const status = pm.environment.get('status');
        const code = status.code;
        return code;
      }

      // Using the methods - this should also be commented out
      const result = api.fetch('users');
      const statusCode = getStatusCode();
"#;
    let expected = r#"
      // Object with methods using pm
/*
      const api = {
        baseUrl: pm.environment.get('baseUrl'),
        getToken() {
          return pm.environment.get('token');
        },
        async fetch(endpoint) {
          const token = this.getToken();
          const response = await fetch(`${this.baseUrl}/${endpoint}`, {
            headers: {
              'Authorization': `Bearer ${token}`
            }
          });
          return response.json();
        }
      };
*/

/*
      const getStatusCode = () => {
        const status = pm.environment.get('status');
        const code = status.code;
        return code;
      }
*/

      // Using the methods - this should also be commented out
/*       const result = api.fetch('users'); */
/*       const statusCode = getStatusCode(); */
"#;
    assert_eq!(transform(input), expected);
}

#[test]
fn tainted_function_declarations_and_their_callers() {
    let input = r#"function handleResponse(response) {
  if (pm.environment.get('isDebug') === 'true') {
    console.log('Debug mode - full response:', response);
  }
  return pm.response.text();
}

function formatOutput(data) {
  return JSON.stringify(data, null, 2);
}

const responseData = handleResponse('{"success":true}');
const formatted = formatOutput(responseData);
"#;
    let output = transform(input);
    assert_block(&output, "function handleResponse(response) {", "}");
    assert_untouched(&output, "function formatOutput(data) {");
    assert_untouched(&output, "  return JSON.stringify(data, null, 2);");
    assert_commented(&output, "const responseData = handleResponse('{\"success\":true}');");
    assert_commented(&output, "const formatted = formatOutput(responseData);");
}

#[test]
fn default_parameter_taints_function() {
    let input = "function processData(value = pm.variables.get('default')) {\n  return value;\n}\nconst processed = processData();\n";
    let output = transform(input);
    assert_block(
        &output,
        "function processData(value = pm.variables.get('default')) {",
        "}",
    );
    assert_commented(&output, "const processed = processData();");
}

#[test]
fn clean_functions_stay() {
    let input = "function pureFunction(a, b) {\n  return a + b;\n}\nconst sum = pureFunction(1, 2);\nconst pmData = pm.variables.get('data');\n";
    assert_eq!(
        transform(input),
        "function pureFunction(a, b) {\n  return a + b;\n}\nconst sum = pureFunction(1, 2);\n/* const pmData = pm.variables.get('data'); */\n"
    );
}

#[test]
fn arrow_functions_and_callers() {
    let input = r#"const add = (a, b) => a + b;
const getValue = key => pm.variables.get(key);
const sum = add(5, 10);
const apiKey = getValue('apiKey');
"#;
    assert_eq!(
        transform(input),
        r#"const add = (a, b) => a + b;
/* const getValue = key => pm.variables.get(key); */
const sum = add(5, 10);
/* const apiKey = getValue('apiKey'); */
"#
    );
}

#[test]
fn tagged_templates_and_template_literals() {
    let input = "const baseUrl = pm.environment.get('baseUrl');\nconst url = `${baseUrl}/api`;\nconst sql = gql`user(${pm.environment.get('id')})`;\nconst plain = `pm`;\n";
    let output = transform(input);
    assert_commented(&output, "const baseUrl = pm.environment.get('baseUrl');");
    assert_commented(&output, "const url = `${baseUrl}/api`;");
    assert_commented(&output, "const sql = gql`user(${pm.environment.get('id')})`;");
    assert_untouched(&output, "const plain = `pm`;");
}

// ============================================================================
// CONTROL FLOW
// ============================================================================

#[test]
fn if_statements() {
    let input = r#"if (pm.variables.has('feature_flag')) {
  console.log('Feature is enabled');
} else {
  console.log('Feature is disabled');
}
if (true) {
  console.log('This should remain untouched');
}
"#;
    assert_eq!(
        transform(input),
        r#"/*
if (pm.variables.has('feature_flag')) {
  console.log('Feature is enabled');
} else {
  console.log('Feature is disabled');
}
*/
if (true) {
  console.log('This should remain untouched');
}
"#
    );
}

#[test]
fn nested_reference_comments_whole_outer_statement_once() {
    let input = r#"if (true) {
  if (pm.variables.get('nested') === 'yes') {
    console.log('Nested condition met');
  }
} else {
  pm.environment.set('condition', 'false');
}
"#;
    let output = transform(input);
    assert_eq!(output.matches("/*").count(), 1);
    assert_eq!(output.matches("*/").count(), 1);
    assert_block(&output, "if (true) {", "}");
}

#[test]
fn loops() {
    let input = r#"for (let i = 0; i < pm.variables.get('count'); i++) {
  console.log('Iteration:', i);
}
for (let ix = 0; ix < 3; ix++) {
  console.log('Clean iteration');
}
let j = 0;
while (j < 3) {
  pm.environment.set('index', j);
  j++;
}
let k = 0;
do {
  k++;
} while (k < pm.info.iteration);
for (const item of pm.iterationData.toObject()) {
  console.log(item);
}
"#;
    let output = transform(input);
    assert_block(&output, "for (let i = 0; i < pm.variables.get('count'); i++) {", "}");
    assert_untouched(&output, "for (let ix = 0; ix < 3; ix++) {");
    assert_untouched(&output, "let j = 0;");
    assert_block(&output, "while (j < 3) {", "}");
    assert_untouched(&output, "let k = 0;");
    assert_block(&output, "do {", "} while (k < pm.info.iteration);");
    assert_block(&output, "for (const item of pm.iterationData.toObject()) {", "}");
}

#[test]
fn switch_and_try() {
    let input = r#"switch (process.env.NODE_ENV) {
  case 'production':
    pm.environment.set('isProduction', true);
    break;
  default:
    console.log('Unknown environment');
}
switch ('test') {
  case 'test':
    console.log('Test case');
}
try {
  console.log('Trying something');
} catch (error) {
  console.error('Error:', error);
} finally {
  pm.variables.set('completed', true);
}
try {
  console.log('Clean try');
} catch (error) {
  console.error('Clean catch');
}
"#;
    let output = transform(input);
    assert_block(&output, "switch (process.env.NODE_ENV) {", "}");
    assert_untouched(&output, "switch ('test') {");
    assert_block(&output, "try {", "}");
    assert_untouched(&output, "  console.log('Clean try');");
    assert_eq!(output.matches("/*").count(), 2);
}

// ============================================================================
// REPORTS AND PARSE TIERS
// ============================================================================

#[test]
fn adjacent_blocks_are_not_fused() {
    let report = Scrubber::default().analyze("pm.a();\npm.b();\nlet c = 1;");
    assert_eq!(report.blocks, vec![LineRange::single(1), LineRange::single(2)]);
    assert_eq!(report.output, "/* pm.a(); */\n/* pm.b(); */\nlet c = 1;");
}

#[test]
fn typed_scripts_use_the_script_tier() {
    let report = Scrubber::default().analyze("const n: number = pm.info.iteration;\nlet m = 1;");
    assert_eq!(report.tier, ParseTier::Script);
    assert_eq!(
        report.output,
        "/* const n: number = pm.info.iteration; */\nlet m = 1;"
    );
}

#[test]
fn broken_scripts_still_produce_output() {
    let input = "pm.test('a');\nconst = = ;\nlet ok = 1;";
    let report = Scrubber::default().analyze(input);
    assert_eq!(report.tier, ParseTier::Loose);
    assert!(report.output.contains("let ok = 1;"));

    // Multi-line blocks add one `/*` and one `*/` line each; nothing else moves.
    let multi_line_blocks = report.blocks.iter().filter(|b| !b.is_single_line()).count();
    assert_eq!(
        report.output.split('\n').count(),
        input.split('\n').count() + 2 * multi_line_blocks
    );
}

#[test]
fn line_scan_fallback_flags_lines_lost_to_parse_errors() {
    let input = "const token = 'abc';\n// pm stays a comment\nconsole.log(token); // pm\npm.environment.set('token', () => {";
    let scrubber = Scrubber::new(ScrubConfig {
        line_scan_fallback: true,
        ..ScrubConfig::default()
    });
    let report = scrubber.analyze(input);
    assert!(report.line_scan);
    assert_eq!(
        report.output,
        "const token = 'abc';\n// pm stays a comment\nconsole.log(token); // pm\n/* pm.environment.set('token', () => { */"
    );

    assert_eq!(transform(input), input);
}

// ============================================================================
// DEEP NESTING
// ============================================================================

#[test]
fn long_operator_chain_does_not_exhaust_the_stack() {
    let chain = vec!["'a'"; 20_000].join(" + ");
    let input = format!("const s = {};\npm.test();", chain);
    assert_eq!(transform(&input), format!("const s = {};\n/* pm.test(); */", chain));
}

#[test]
fn long_else_if_ladder_does_not_exhaust_the_stack() {
    let mut ladder = String::from("if (n === 0) { run(); }");
    for i in 1..5_000 {
        ladder.push_str(&format!(" else if (n === {}) {{ run(); }}", i));
    }
    let input = format!("{}\npm.test();", ladder);
    assert_eq!(transform(&input), format!("{}\n/* pm.test(); */", ladder));
}
